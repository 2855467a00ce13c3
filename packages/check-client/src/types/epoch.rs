//! Epoch-second timestamps arrive as integers or string-encoded integers
//! depending on the field, so decoding has to accept both.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

struct EpochVisitor;

impl Visitor<'_> for EpochVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an epoch-seconds integer or numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::custom("epoch seconds out of range"))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        Ok(value as i64)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
        value.trim().parse().map_err(de::Error::custom)
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(EpochVisitor)
}

/// Null-tolerant variant for log entries whose shape makes the field
/// optional.
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Seconds(#[serde(deserialize_with = "deserialize")] i64);

    Option::<Seconds>::deserialize(deserializer).map(|opt| opt.map(|Seconds(value)| value))
}

//! Choose between the identity-bearing and anonymized authorship twins.
//!
//! The flattener emits every "who did this" column twice: the real name
//! and an `_anon` twin holding a constant placeholder. Redaction keeps
//! exactly one of each pair.

use indexmap::IndexMap;

use crate::table::{Row, Table};

/// Suffix marking the anonymized twin of an authorship column.
pub const ANON_SUFFIX: &str = "_anon";

/// Apply the anonymize flag to every `_anon` twin pair.
///
/// With `anonymize` set, the identity-bearing column is dropped and the
/// suffixed twin is kept under the base name, so the output schema is the
/// same either way. With it unset, the suffixed twin is dropped. No-op on
/// an empty table.
pub fn redact(table: &mut Table, anonymize: bool) {
    for row in table.rows_mut() {
        if anonymize {
            *row = anonymized(row);
        } else {
            let suffixed: Vec<String> = row
                .columns()
                .filter(|column| column.ends_with(ANON_SUFFIX))
                .map(String::from)
                .collect();
            for column in suffixed {
                row.remove(&column);
            }
        }
    }
}

/// Rebuild a row keeping each `_anon` twin under its base name, in the
/// position the twin occupied.
fn anonymized(row: &Row) -> Row {
    let mut fields = IndexMap::new();
    for (column, value) in row.iter() {
        if let Some(base) = column.strip_suffix(ANON_SUFFIX) {
            fields.insert(base.to_string(), value.clone());
        } else if row.get(&format!("{column}{ANON_SUFFIX}")).is_some() {
            continue;
        } else {
            fields.insert(column.to_string(), value.clone());
        }
    }
    Row::from(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, RowBuilder};

    fn authored_table() -> Table {
        let mut table = Table::new();
        table.push(
            RowBuilder::new()
                .with("item", "1")
                .with("added_by", "Ada Lovelace")
                .with("added_by_anon", "Anonymous")
                .with("status", "verified")
                .with("task_added_by", "Grace Hopper")
                .with("task_added_by_anon", "Anonymous")
                .build(),
        );
        table
    }

    #[test]
    fn keeping_real_names_drops_every_suffixed_twin() {
        let mut table = authored_table();
        redact(&mut table, false);
        assert_eq!(
            table.columns(),
            vec!["item", "added_by", "status", "task_added_by"]
        );
        assert_eq!(
            table.rows()[0].get("added_by"),
            Some(&Cell::Text("Ada Lovelace".into()))
        );
    }

    #[test]
    fn anonymizing_keeps_twins_under_base_names() {
        let mut table = authored_table();
        redact(&mut table, true);
        assert_eq!(
            table.columns(),
            vec!["item", "added_by", "status", "task_added_by"]
        );
        assert_eq!(
            table.rows()[0].get("added_by"),
            Some(&Cell::Text("Anonymous".into()))
        );
        assert_eq!(
            table.rows()[0].get("task_added_by"),
            Some(&Cell::Text("Anonymous".into()))
        );
    }

    #[test]
    fn redaction_never_leaves_both_or_neither() {
        for anonymize in [false, true] {
            let mut table = authored_table();
            redact(&mut table, anonymize);
            let columns = table.columns();
            assert!(columns.contains(&"added_by"));
            assert!(!columns.iter().any(|c| c.ends_with(ANON_SUFFIX)));
        }
    }

    #[test]
    fn empty_table_is_a_no_op() {
        let mut table = Table::new();
        redact(&mut table, true);
        assert!(table.is_empty());
    }
}

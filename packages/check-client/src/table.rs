//! Flat table model for the export.
//!
//! Rows are insertion-ordered field maps; the table's column set is the
//! union of all row columns in first-seen order. A missing key is how a
//! row expresses an absent value, so rows with differing optional columns
//! still form one rectangular table.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// One table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Timestamp(DateTime<Utc>),
    Duration(Duration),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Timestamp(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            // Durations render as whole seconds, the analysis-friendly form.
            Cell::Duration(value) => write!(f, "{}", value.num_seconds()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Text(value) => serializer.serialize_str(value),
            Cell::Int(value) => serializer.serialize_i64(*value),
            Cell::Timestamp(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Cell::Duration(value) => serializer.serialize_i64(value.num_seconds()),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Timestamp(value)
    }
}

impl From<Duration> for Cell {
    fn from(value: Duration) -> Self {
        Cell::Duration(value)
    }
}

/// One flat row: an insertion-ordered map from column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<String, Cell>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.fields.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Remove a column, preserving the order of the remaining ones.
    pub fn remove(&mut self, column: &str) -> Option<Cell> {
        self.fields.shift_remove(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, Cell>> for Row {
    fn from(fields: IndexMap<String, Cell>) -> Self {
        Self { fields }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Immutable copy-and-extend row construction: a builder holds a field
/// set, `with`/`with_opt` produce extended sets, and cloning a partially
/// built base is how derived rows start. Every step stays pure.
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    fields: IndexMap<String, Cell>,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Set a column value, or leave the column absent entirely.
    pub fn with_opt<V: Into<Cell>>(self, column: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(column, value),
            None => self,
        }
    }

    pub fn build(self) -> Row {
        Row {
            fields: self.fields,
        }
    }
}

/// An ordered collection of rows forming a rectangular table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of all row columns, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = IndexSet::new();
        for row in &self.rows {
            for column in row.columns() {
                columns.insert(column);
            }
        }
        columns.into_iter().collect()
    }

    /// Render as CSV with minimal quoting. Absent values render empty.
    pub fn to_csv(&self) -> String {
        let columns = self.columns();
        let mut out = String::new();
        let header: Vec<String> = columns.iter().map(|c| csv_field(c)).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = columns
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(|cell| csv_field(&cell.to_string()))
                        .unwrap_or_default()
                })
                .collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_copy_and_extend_leaves_base_untouched() {
        let base = RowBuilder::new().with("item", "1").with("status", "verified");
        let derived = base.clone().with("task", "1/1").build();
        let plain = base.build();

        assert_eq!(plain.len(), 2);
        assert_eq!(derived.len(), 3);
        assert_eq!(derived.get("task"), Some(&Cell::Text("1/1".into())));
        assert!(plain.get("task").is_none());
    }

    #[test]
    fn with_opt_keeps_absent_columns_out() {
        let row = RowBuilder::new()
            .with_opt("tags", Some("a, b"))
            .with_opt::<&str>("comments", None)
            .build();
        assert!(row.get("tags").is_some());
        assert!(row.get("comments").is_none());
    }

    #[test]
    fn column_union_preserves_first_seen_order() {
        let mut table = Table::new();
        table.push(RowBuilder::new().with("a", 1i64).with("b", 2i64).build());
        table.push(RowBuilder::new().with("a", 3i64).with("c", 4i64).build());
        assert_eq!(table.columns(), vec!["a", "b", "c"]);
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let mut table = Table::new();
        table.push(
            RowBuilder::new()
                .with("text", "plain")
                .with("tricky", "a, \"b\"\nc")
                .build(),
        );
        let csv = table.to_csv();
        assert_eq!(csv, "text,tricky\nplain,\"a, \"\"b\"\"\nc\"\n");
    }

    #[test]
    fn absent_cells_render_empty() {
        let mut table = Table::new();
        table.push(RowBuilder::new().with("a", 1i64).with("b", 2i64).build());
        table.push(RowBuilder::new().with("b", 3i64).build());
        let csv = table.to_csv();
        assert_eq!(csv, "a,b\n1,2\n,3\n");
    }

    #[test]
    fn duration_cells_serialize_as_seconds() {
        let cell = Cell::Duration(Duration::seconds(90));
        assert_eq!(cell.to_string(), "90");
        assert_eq!(serde_json::to_string(&cell).unwrap(), "90");
    }
}

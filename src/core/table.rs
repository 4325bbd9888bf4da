//! Dynamic row table used as the result shape of every query.
//!
//! Rows are JSON objects whose shape is dictated by the remote service. The
//! table keeps the ordered union of every column it has seen so rows with
//! different shapes can be concatenated.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// One row: column name to JSON value
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records, collecting columns in first-seen order
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Table::new();
        for record in records {
            table.push(record);
        }
        table
    }

    /// Build a table from JSON values, each of which must be an object
    ///
    /// Returns the index of the first non-object value on failure.
    pub fn from_values(values: Vec<Value>) -> Result<Self, usize> {
        let mut table = Table::new();
        for (index, value) in values.into_iter().enumerate() {
            match value {
                Value::Object(record) => table.push(record),
                _ => return Err(index),
            }
        }
        Ok(table)
    }

    /// Single-row table
    pub fn from_record(record: Record) -> Self {
        Self::from_records(vec![record])
    }

    pub fn push(&mut self, record: Record) {
        for key in record.keys() {
            self.track_column(key);
        }
        self.rows.push(record);
    }

    fn track_column(&mut self, name: &str) {
        if !self.columns.iter().any(|c| c == name) {
            self.columns.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.rows
    }

    /// Value at `row`/`column`; missing cells read as `None`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All values of a column, `Null` where a row lacks it
    pub fn column_values(&self, column: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.get(column).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Concatenate `other` below this table
    pub fn append(&mut self, other: Table) {
        for column in &other.columns {
            self.track_column(column);
        }
        self.rows.extend(other.rows);
    }

    /// Assign `value` to `name` on every row, overwriting existing values
    pub fn set_column(&mut self, name: &str, value: Value) {
        self.track_column(name);
        for row in &mut self.rows {
            row.insert(name.to_string(), value.clone());
        }
    }

    /// Rows matching `predicate`, keeping the column set
    pub fn filter<P>(&self, mut predicate: P) -> Table
    where
        P: FnMut(&Record) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Rename every column through `rename`
    pub fn rename_columns<F>(self, rename: F) -> Table
    where
        F: Fn(&str) -> String,
    {
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(|(k, v)| (rename(&k), v)).collect())
            .collect::<Vec<Record>>();

        let mut table = Table::new();
        for column in &self.columns {
            table.track_column(&rename(column));
        }
        for row in rows {
            table.push(row);
        }
        table
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = crate::display::TableDisplay::new().render(self);
        f.write_str(&rendered)
    }
}

/// Text form of a cell
///
/// Booleans render as `True`/`False`, matching how the service's boolean
/// flags appear once flattened to text; null renders empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Text of `column` in `record`, `None` when absent or null
pub fn record_text(record: &Record, column: &str) -> Option<String> {
    match record.get(column) {
        None | Some(Value::Null) => None,
        Some(value) => Some(cell_text(value)),
    }
}

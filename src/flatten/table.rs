//! Page and table types

use super::flattener::flatten_record;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A flattened record: column name to scalar value
pub type Record = Map<String, Value>;

/// One HTTP response worth of decoded data
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// A list of flattened records
    Table(Table),
    /// Any response that is not a list of objects, kept as decoded
    Raw(Value),
}

impl Page {
    /// Check if this page is tabular
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Table(_))
    }

    /// Borrow the table, if tabular
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            Self::Raw(_) => None,
        }
    }

    /// Number of rows, if tabular
    pub fn row_count(&self) -> Option<usize> {
        self.as_table().map(Table::len)
    }

    /// Render as JSON: an array of flat records, or the raw value
    pub fn to_json(&self) -> Value {
        match self {
            Self::Table(table) => Value::Array(table.to_json()),
            Self::Raw(value) => value.clone(),
        }
    }
}

/// Kind of scalar held by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Number,
    String,
}

impl ColumnKind {
    /// Kind of a flattened value; `None` for null
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(_) => Some(Self::Number),
            // Flattened records only hold scalars; anything else is treated as text
            Value::String(_) | Value::Array(_) | Value::Object(_) => Some(Self::String),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
        }
    }
}

/// Two tables disagree on the kind of a shared column
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("column '{column}' holds {existing} values but the new page has {incoming}")]
pub struct SchemaConflict {
    /// Column name
    pub column: String,
    /// Kind in the accumulated table
    pub existing: ColumnKind,
    /// Kind in the incoming table
    pub incoming: ColumnKind,
}

/// Flattened records with a column list in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten JSON records into a table
    pub fn from_records(records: impl IntoIterator<Item = Value>) -> Self {
        Self::from_flat_rows(records.into_iter().map(|r| flatten_record(&r)).collect())
    }

    /// Build a table from records that are already flat
    pub fn from_flat_rows(rows: Vec<Record>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append one flat record
    pub fn push_row(&mut self, row: Record) {
        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a column, `None` where a row lacks the field
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }

    /// Kind of the first non-null value in a column
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).flatten().find_map(ColumnKind::of)
    }

    /// Check that every column shared with `other` holds the same kind of value
    pub fn check_compatible(&self, other: &Table) -> Result<(), SchemaConflict> {
        let ours: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        for column in other.columns.iter().filter(|c| ours.contains(c.as_str())) {
            if let (Some(existing), Some(incoming)) =
                (self.column_kind(column), other.column_kind(column))
            {
                if existing != incoming {
                    return Err(SchemaConflict {
                        column: column.clone(),
                        existing,
                        incoming,
                    });
                }
            }
        }
        Ok(())
    }

    /// Concatenate `other` after this table's rows.
    ///
    /// On a conflict `self` is left untouched and `other` is handed back
    /// together with the conflict.
    pub fn append(&mut self, other: Table) -> Result<(), (SchemaConflict, Table)> {
        if let Err(conflict) = self.check_compatible(&other) {
            return Err((conflict, other));
        }
        for column in other.columns {
            if !self.columns.contains(&column) {
                self.columns.push(column);
            }
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Render rows as JSON objects with every column present
    pub fn to_json(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let filled: Record = self
                    .columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                    .collect();
                Value::Object(filled)
            })
            .collect()
    }
}

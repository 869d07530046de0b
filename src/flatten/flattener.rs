//! JSON flattener
//!
//! Converts nested JSON into flat records keyed by field paths.

use super::table::{Page, Record, Table};
use crate::error::Result;
use serde_json::Value;
use tracing::warn;

/// Column name used when a record is not a JSON object
const SCALAR_COLUMN: &str = "value";

/// JSON flattener with an optional record path
#[derive(Debug, Clone)]
pub struct Flattener {
    /// Separator between path segments
    separator: String,
    /// Dot-notation path to the records inside the response
    record_path: Option<String>,
}

impl Default for Flattener {
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            record_path: None,
        }
    }
}

impl Flattener {
    /// Create a flattener using `.` as path separator
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different path separator
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Read records from a nested field, e.g. `cards` for search results
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Parse a JSON body and flatten it
    pub fn decode(&self, body: &str) -> Result<Page> {
        let value: Value = serde_json::from_str(body)?;
        Ok(self.flatten_page(value))
    }

    /// Flatten one decoded response into a page.
    ///
    /// Zero-element values (`[]`, `{}`, `null`) become an empty table. An
    /// array whose elements are all objects becomes a table. Everything
    /// else is returned untouched as [`Page::Raw`].
    pub fn flatten_page(&self, value: Value) -> Page {
        let value = match &self.record_path {
            Some(path) => match extract_path(&value, path) {
                Some(inner) => inner.clone(),
                None => {
                    warn!(record_path = %path, "Record path not found in response, treating it as empty");
                    Value::Null
                }
            },
            None => value,
        };

        match value {
            Value::Null => Page::Table(Table::new()),
            Value::Object(map) if map.is_empty() => Page::Table(Table::new()),
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let rows = items.iter().map(|item| self.flatten_record(item)).collect();
                Page::Table(Table::from_flat_rows(rows))
            }
            other => Page::Raw(other),
        }
    }

    /// Flatten a single record.
    ///
    /// Nested objects contribute `parent.child` columns and arrays
    /// contribute `parent.0`, `parent.1`, ... columns. Empty objects and
    /// arrays keep their own name with a null value so no field disappears.
    pub fn flatten_record(&self, value: &Value) -> Record {
        let mut record = Record::new();
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten_into(key.clone(), child, &mut record);
                }
            }
            other => self.flatten_into(SCALAR_COLUMN.to_string(), other, &mut record),
        }
        record
    }

    fn flatten_into(&self, path: String, value: &Value, out: &mut Record) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    let child_path = format!("{path}{}{key}", self.separator);
                    self.flatten_into(child_path, child, out);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (idx, item) in items.iter().enumerate() {
                    let child_path = format!("{path}{}{idx}", self.separator);
                    self.flatten_into(child_path, item, out);
                }
            }
            Value::Object(_) | Value::Array(_) => insert_field(out, path, Value::Null),
            scalar => insert_field(out, path, scalar.clone()),
        }
    }
}

fn insert_field(out: &mut Record, path: String, value: Value) {
    if out.contains_key(&path) {
        warn!(
            field = %path,
            "Flattened field name collides with an existing field, keeping the first value"
        );
        return;
    }
    out.insert(path, value);
}

/// Follow a dot-notation path through nested objects
fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(value, |current, part| current.get(part))
}

/// Flatten a decoded response with the default flattener
pub fn flatten_page(value: Value) -> Page {
    Flattener::default().flatten_page(value)
}

/// Flatten a single record with the default flattener
pub fn flatten_record(value: &Value) -> Record {
    Flattener::default().flatten_record(value)
}

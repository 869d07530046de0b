//! Arrow schema inference and Table to Arrow conversion
//!
//! Flattened tables only hold scalars, so every column maps onto one of
//! Boolean, Int64, Float64 or Utf8. Columns with no non-null value become
//! nullable Utf8.

use crate::error::Result;
use crate::flatten::Table;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;
use std::sync::Arc;

/// Infer an Arrow schema for a table, one nullable field per column
pub fn table_schema(table: &Table) -> Schema {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|name| Field::new(name, column_type(table, name), true))
        .collect();
    Schema::new(fields)
}

/// Convert a table to an Arrow RecordBatch
pub fn table_to_arrow(table: &Table) -> Result<RecordBatch> {
    let schema = Arc::new(table_schema(table));

    // Rows made only of `{}` have no columns, so the row count must be explicit
    if table.columns().is_empty() {
        let options = RecordBatchOptions::new().with_row_count(Some(table.len()));
        return Ok(RecordBatch::try_new_with_options(schema, Vec::new(), &options)?);
    }

    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&Value>> = table.column(field.name()).collect();
            build_array(&values, field.data_type())
        })
        .collect();

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// Merge the types of every value in a column
fn column_type(table: &Table, name: &str) -> DataType {
    table
        .column(name)
        .flatten()
        .filter_map(infer_type)
        .reduce(|a, b| merge_types(&a, &b))
        .unwrap_or(DataType::Utf8)
}

/// Infer Arrow DataType from a flattened value; `None` for null
fn infer_type(value: &Value) -> Option<DataType> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(DataType::Boolean),
        Value::Number(n) if n.is_i64() => Some(DataType::Int64),
        Value::Number(_) => Some(DataType::Float64),
        _ => Some(DataType::Utf8),
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        // Numbers can merge (prefer Float64 for mixed)
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Arc::new(arr)
        }

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Arc::new(arr)
        }
    }
}

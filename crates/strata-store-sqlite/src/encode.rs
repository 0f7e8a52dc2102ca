//! Conversion between core [`Value`]s and rusqlite's value types.
//!
//! TEXT cells that are not valid UTF-8 are decoded lossily.

use rusqlite::types::{Value as SqlValue, ValueRef};
use strata_core::{Row, Value};

pub fn encode_value(value: Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(i),
    Value::Real(f) => SqlValue::Real(f),
    Value::Text(s) => SqlValue::Text(s),
    Value::Blob(b) => SqlValue::Blob(b),
  }
}

pub fn decode_value(value: ValueRef<'_>) -> Value {
  match value {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(f) => Value::Real(f),
    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Value::Blob(b.to_vec()),
  }
}

/// Decode one result row, keyed by the statement's column names.
pub fn decode_row(names: &[String], row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
  let mut out = Row::new();
  for (idx, name) in names.iter().enumerate() {
    out.insert(name.clone(), decode_value(row.get_ref(idx)?));
  }
  Ok(out)
}

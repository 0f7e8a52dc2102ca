//! Column values and result rows.
//!
//! [`Value`] mirrors the five SQLite storage classes. [`Row`] is an ordered
//! field-name → value mapping; its order is the column order of the statement
//! that produced it, and it serialises to a JSON object in that order.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::ser::{Serialize, SerializeMap, Serializer};

// ─── Value ───────────────────────────────────────────────────────────────────

/// A single bound parameter or result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl Value {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }
}

impl Serialize for Value {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Value::Null => serializer.serialize_unit(),
      Value::Integer(i) => serializer.serialize_i64(*i),
      Value::Real(f) => serializer.serialize_f64(*f),
      Value::Text(s) => serializer.serialize_str(s),
      Value::Blob(b) => serializer.serialize_str(&B64.encode(b)),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<f64> for Value {
  fn from(f: f64) -> Self { Self::Real(f) }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self { Self::Blob(b) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// An ordered field-name → value mapping.
///
/// Field names are unique; inserting an existing name replaces its value in
/// place without changing its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  fields: Vec<(String, Value)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    let name = name.into();
    let value = value.into();
    match self.fields.iter_mut().find(|(n, _)| *n == name) {
      Some((_, slot)) => *slot = value,
      None => self.fields.push((name, value)),
    }
  }

  /// Builder-style [`Row::insert`].
  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
  }

  pub fn remove(&mut self, name: &str) -> Option<Value> {
    let idx = self.fields.iter().position(|(n, _)| n == name)?;
    Some(self.fields.remove(idx).1)
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn columns(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|(n, _)| n.as_str())
  }

  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self.fields.iter().map(|(_, v)| v)
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut row = Row::new();
    for (k, v) in iter {
      row.insert(k, v);
    }
    row
  }
}

impl IntoIterator for Row {
  type Item = (String, Value);
  type IntoIter = std::vec::IntoIter<(String, Value)>;

  fn into_iter(self) -> Self::IntoIter { self.fields.into_iter() }
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

//! Error types for `strata-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A table or column name that is not a plain SQL identifier.
  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("table {0} declares no columns")]
  EmptyColumns(String),

  /// `UPDATE` and `DELETE` refuse to run without a filter.
  #[error("refusing to {0} without a predicate")]
  EmptyPredicate(&'static str),

  #[error("statement has {placeholders} placeholders but {bound} bound values")]
  ParameterCount { placeholders: usize, bound: usize },

  #[error("missing required field {0:?}")]
  MissingField(String),

  #[error("field {field:?} expects {expected}")]
  FieldType { field: String, expected: &'static str },

  #[error("invalid vertical definition: {0}")]
  InvalidVertical(String),

  #[error("unknown vertical: {0:?}")]
  UnknownVertical(String),

  #[error("blob decode error: {0}")]
  Blob(#[from] base64::DecodeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! SQL text paired with its positional bound values.

use crate::{Error, Result, value::Value};

/// A statement (or statement fragment) ready to be executed.
///
/// The number of `?` placeholders in `sql` always equals `params.len()`;
/// [`Statement::new`] refuses to build one otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  sql:    String,
  params: Vec<Value>,
}

impl Statement {
  pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Result<Self> {
    let sql = sql.into();
    let placeholders = count_placeholders(&sql);
    if placeholders != params.len() {
      return Err(Error::ParameterCount { placeholders, bound: params.len() });
    }
    Ok(Self { sql, params })
  }

  /// A statement with no bound values.
  pub fn raw(sql: impl Into<String>) -> Result<Self> { Self::new(sql, Vec::new()) }

  pub fn sql(&self) -> &str { &self.sql }

  pub fn params(&self) -> &[Value] { &self.params }

  pub fn into_parts(self) -> (String, Vec<Value>) { (self.sql, self.params) }
}

/// Count `?` placeholders outside quoted literals and identifiers.
pub(crate) fn count_placeholders(sql: &str) -> usize {
  let mut count = 0;
  let mut quote: Option<char> = None;
  for c in sql.chars() {
    match (quote, c) {
      (Some(q), c) if c == q => quote = None,
      (Some(_), _) => {}
      (None, '\'' | '"') => quote = Some(c),
      (None, '?') => count += 1,
      (None, _) => {}
    }
  }
  count
}

//! Structured WHERE predicates.
//!
//! A predicate has two branches: an AND branch of `column = value` equality
//! terms and an OR branch of caller-supplied sub-conditions. Values in both
//! branches are always bound, never spliced into the SQL text.

use super::{ident, statement::Statement};
use crate::{Result, value::Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
  and: Vec<(String, Value)>,
  or:  Vec<Statement>,
}

impl Predicate {
  pub fn new() -> Self { Self::default() }

  /// Shorthand for a single equality term.
  pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
    Self::new().and(column, value)
  }

  /// Add `column = value` to the AND branch. Repeating a column replaces its
  /// earlier value.
  pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
    let column = column.into();
    let value = value.into();
    match self.and.iter_mut().find(|(c, _)| *c == column) {
      Some((_, slot)) => *slot = value,
      None => self.and.push((column, value)),
    }
    self
  }

  /// Add a sub-condition to the OR branch. The condition's own placeholders
  /// are bound with its own values.
  pub fn or(mut self, condition: Statement) -> Self {
    self.or.push(condition);
    self
  }

  pub fn is_empty(&self) -> bool { self.and.is_empty() && self.or.is_empty() }

  pub fn and_terms(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.and.iter().map(|(c, v)| (c.as_str(), v))
  }

  /// Render the boolean expression that follows `WHERE`.
  ///
  /// Returns `None` for an empty predicate; callers omit the clause.
  pub fn render(&self) -> Result<Option<Statement>> {
    if self.is_empty() {
      return Ok(None);
    }

    let mut parts = Vec::with_capacity(2);
    let mut params = Vec::new();

    if !self.and.is_empty() {
      let terms = self
        .and
        .iter()
        .map(|(column, _)| ident(column).map(|c| format!("{c} = ?")))
        .collect::<Result<Vec<_>>>()?;
      parts.push(format!("({})", terms.join(" AND ")));
      params.extend(self.and.iter().map(|(_, v)| v.clone()));
    }

    if !self.or.is_empty() {
      let terms: Vec<&str> = self.or.iter().map(Statement::sql).collect();
      parts.push(format!("({})", terms.join(" OR ")));
      params.extend(self.or.iter().flat_map(|s| s.params().iter().cloned()));
    }

    Statement::new(parts.join(" AND "), params).map(Some)
  }
}

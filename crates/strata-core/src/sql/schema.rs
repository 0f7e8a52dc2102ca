//! Table schema declarations consumed by [`build::create_table`](super::build::create_table).

use super::{reference::Reference, types::ColumnType};

/// A column name with its ordered type/constraint tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
  pub name:  String,
  pub types: Vec<ColumnType>,
}

/// Columns in declaration order plus at most one foreign key per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
  name:       String,
  columns:    Vec<ColumnDef>,
  references: Vec<(String, Reference)>,
}

impl TableSchema {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), columns: Vec::new(), references: Vec::new() }
  }

  pub fn column(
    mut self,
    name: impl Into<String>,
    types: impl IntoIterator<Item = ColumnType>,
  ) -> Self {
    self.columns.push(ColumnDef { name: name.into(), types: types.into_iter().collect() });
    self
  }

  /// Declare a foreign key on `column`, replacing any earlier one.
  pub fn reference(mut self, column: impl Into<String>, target: Reference) -> Self {
    let column = column.into();
    match self.references.iter_mut().find(|(c, _)| *c == column) {
      Some((_, slot)) => *slot = target,
      None => self.references.push((column, target)),
    }
    self
  }

  pub fn name(&self) -> &str { &self.name }

  pub fn columns(&self) -> &[ColumnDef] { &self.columns }

  pub fn references(&self) -> impl Iterator<Item = (&str, &Reference)> {
    self.references.iter().map(|(c, r)| (c.as_str(), r))
  }
}

//! Column type/constraint tokens and referential actions.

use std::fmt;

use strum::EnumIter;

/// One token of a column declaration, e.g. `TEXT` or `NOT NULL`.
///
/// A declaration is an ordered list of these, rendered space-separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ColumnType {
  PrimaryKey,
  ForeignKey,
  Integer,
  Real,
  Text,
  Blob,
  Null,
  NotNull,
  Unique,
}

impl ColumnType {
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::PrimaryKey => "PRIMARY KEY",
      Self::ForeignKey => "FOREIGN KEY",
      Self::Integer => "INTEGER",
      Self::Real => "REAL",
      Self::Text => "TEXT",
      Self::Blob => "BLOB",
      Self::Null => "NULL",
      Self::NotNull => "NOT NULL",
      Self::Unique => "UNIQUE",
    }
  }
}

impl fmt::Display for ColumnType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_sql()) }
}

/// `ON DELETE` / `ON UPDATE` action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ReferentialAction {
  Cascade,
  SetNull,
  Restrict,
  NoAction,
  SetDefault,
}

impl ReferentialAction {
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Cascade => "CASCADE",
      Self::SetNull => "SET NULL",
      Self::Restrict => "RESTRICT",
      Self::NoAction => "NO ACTION",
      Self::SetDefault => "SET DEFAULT",
    }
  }
}

impl fmt::Display for ReferentialAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_sql()) }
}

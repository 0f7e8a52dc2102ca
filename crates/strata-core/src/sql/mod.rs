//! Schema-definition and statement-construction layer.
//!
//! Everything here is pure: no connection, no I/O. Stores execute the
//! resulting [`Statement`]s.

pub mod build;
mod predicate;
mod reference;
mod schema;
mod statement;
mod types;

pub use build::OrderBy;
pub use predicate::Predicate;
pub use reference::Reference;
pub use schema::{ColumnDef, TableSchema};
pub use statement::Statement;
pub use types::{ColumnType, ReferentialAction};

use crate::{Error, Result};

/// Accept `name` if it is a plain identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn ident(name: &str) -> Result<&str> {
  let mut chars = name.chars();
  let valid = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
    && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());
  if valid { Ok(name) } else { Err(Error::InvalidIdentifier(name.to_owned())) }
}

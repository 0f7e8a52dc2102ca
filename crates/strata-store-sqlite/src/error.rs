//! Error type for `strata-store-sqlite`.

use rusqlite::ErrorCode;
use strata_core::{ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] strata_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(_) => ErrorKind::Invalid,
      Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => sqlite_kind(e),
      Self::Database(tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_)) => {
        ErrorKind::Connection
      }
      Self::Database(_) => ErrorKind::Statement,
    }
  }
}

fn sqlite_kind(e: &rusqlite::Error) -> ErrorKind {
  match e {
    rusqlite::Error::SqliteFailure(f, _) if f.code == ErrorCode::ConstraintViolation => {
      ErrorKind::Constraint
    }
    rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table") => {
      ErrorKind::MissingTable
    }
    rusqlite::Error::SqliteFailure(f, _)
      if matches!(
        f.code,
        ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
      ) =>
    {
      ErrorKind::Connection
    }
    _ => ErrorKind::Statement,
  }
}

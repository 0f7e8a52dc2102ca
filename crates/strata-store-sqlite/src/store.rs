//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::params_from_iter;
use strata_core::{RecordStore, Row, sql::Statement};

use crate::{
  Result,
  encode::{decode_row, encode_value},
  schema::{CONNECTION_PRAGMAS, FILE_PRAGMAS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The process-wide store handle, backed by a single SQLite connection.
///
/// Cloning is cheap; the inner connection is reference-counted. Every clone
/// talks to the same background thread, so statements are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and configure the connection.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    tracing::info!(path = %path.display(), "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.configure(true).await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure(false).await?;
    Ok(store)
  }

  async fn configure(&self, file_backed: bool) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        if file_backed {
          conn.execute_batch(FILE_PRAGMAS)?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection. Clones of this handle fail with a connection
  /// error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::info!("sqlite store closed");
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn query(&self, statement: Statement) -> Result<Vec<Row>> {
    let (sql, params) = statement.into_parts();
    tracing::debug!(%sql, params = params.len(), "query");

    let logged = sql.clone();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        let rows = stmt
          .query_map(params_from_iter(params.into_iter().map(encode_value)), |row| {
            decode_row(&names, row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(|e| {
        tracing::error!(sql = %logged, error = %e, "query failed");
        e.into()
      })
  }

  async fn execute(&self, statement: Statement) -> Result<usize> {
    let (sql, params) = statement.into_parts();
    tracing::debug!(%sql, params = params.len(), "execute");

    let logged = sql.clone();
    self
      .conn
      .call(move |conn| {
        let changed =
          conn.execute(&sql, params_from_iter(params.into_iter().map(encode_value)))?;
        Ok(changed)
      })
      .await
      .map_err(|e| {
        tracing::error!(sql = %logged, error = %e, "statement failed");
        e.into()
      })
  }
}

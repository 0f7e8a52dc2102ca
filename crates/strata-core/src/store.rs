//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `strata-store-sqlite`).
//! Higher layers (`strata-api`, `strata-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use strum::EnumIter;

use crate::{
  sql::{OrderBy, Predicate, Statement, TableSchema, build},
  value::Row,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Coarse classification of a backend failure, used to pick an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ErrorKind {
  /// The statement could not be built (bad identifier, empty predicate, ...).
  Invalid,
  /// A UNIQUE, NOT NULL or FOREIGN KEY constraint rejected the write.
  Constraint,
  MissingTable,
  /// Any other failure while preparing or running a statement.
  Statement,
  Connection,
}

pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the single shared store handle.
///
/// Backends provide [`query`](Self::query) and [`execute`](Self::execute);
/// everything else is built on the statement builders. Each call is its own
/// committed unit.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError + From<crate::Error>;

  /// Run a row-returning statement. Rows keep the result-set column order.
  fn query(
    &self,
    statement: Statement,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + '_;

  /// Run a statement and return the number of affected rows.
  fn execute(
    &self,
    statement: Statement,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Provided ──────────────────────────────────────────────────────────

  /// All matching rows. `predicate: None` (or an empty predicate) matches
  /// every row.
  fn select_many(
    &self,
    table: &str,
    columns: &[&str],
    predicate: Option<&Predicate>,
    order_by: Option<&OrderBy>,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send {
    let statement = build::select(table, columns, predicate, order_by);
    async move { self.query(statement?).await }
  }

  /// The first matching row in `order_by` order, or `None`.
  fn select_one(
    &self,
    table: &str,
    columns: &[&str],
    predicate: Option<&Predicate>,
    order_by: Option<&OrderBy>,
  ) -> impl Future<Output = Result<Option<Row>, Self::Error>> + Send {
    let statement = build::select_first(table, columns, predicate, order_by);
    async move { Ok(self.query(statement?).await?.into_iter().next()) }
  }

  fn insert(
    &self,
    table: &str,
    row: &Row,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send {
    let statement = build::insert(table, row);
    async move {
      self.execute(statement?).await?;
      Ok(())
    }
  }

  /// Returns the number of updated rows; zero means nothing matched.
  fn update(
    &self,
    table: &str,
    set: &Row,
    predicate: &Predicate,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send {
    let statement = build::update(table, set, predicate);
    async move { self.execute(statement?).await }
  }

  /// Returns the number of deleted rows; zero means nothing matched.
  fn delete(
    &self,
    table: &str,
    predicate: &Predicate,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send {
    let statement = build::delete(table, predicate);
    async move { self.execute(statement?).await }
  }

  /// Idempotent: the DDL is `CREATE TABLE IF NOT EXISTS`.
  fn create_table(
    &self,
    schema: &TableSchema,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send {
    let statement = build::create_table(schema);
    async move {
      self.execute(statement?).await?;
      Ok(())
    }
  }

  fn table_exists(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send {
    let predicate = Predicate::eq("type", "table").and("name", name);
    let statement = build::select("sqlite_master", &["name"], Some(&predicate), None);
    async move { Ok(!self.query(statement?).await?.is_empty()) }
  }
}

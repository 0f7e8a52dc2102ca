//! Statement builders.
//!
//! Each function turns structured input into a [`Statement`]. Identifiers are
//! validated and interpolated; every value is bound positionally.

use super::{
  ident,
  predicate::Predicate,
  schema::TableSchema,
  statement::Statement,
};
use crate::{Error, Result, value::Row};

/// `ORDER BY` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
  pub column:     String,
  pub descending: bool,
}

impl OrderBy {
  pub fn asc(column: impl Into<String>) -> Self {
    Self { column: column.into(), descending: false }
  }

  pub fn desc(column: impl Into<String>) -> Self {
    Self { column: column.into(), descending: true }
  }
}

/// `CREATE TABLE IF NOT EXISTS` for `schema`.
///
/// Foreign-key clauses follow the plain columns. A foreign key on an
/// undeclared column is passed through; SQLite rejects it on execution.
pub fn create_table(schema: &TableSchema) -> Result<Statement> {
  let table = ident(schema.name())?;
  if schema.columns().is_empty() {
    return Err(Error::EmptyColumns(table.to_owned()));
  }

  let mut defs = Vec::with_capacity(schema.columns().len());
  for column in schema.columns() {
    let mut def = ident(&column.name)?.to_owned();
    for ty in &column.types {
      def.push(' ');
      def.push_str(ty.as_sql());
    }
    defs.push(def);
  }

  for (column, target) in schema.references() {
    defs.push(format!(
      "FOREIGN KEY ({}) REFERENCES {} ({}){}{}",
      ident(column)?,
      ident(&target.table)?,
      ident(&target.column)?,
      target.render_on_delete(),
      target.render_on_update(),
    ));
  }

  Statement::raw(format!("CREATE TABLE IF NOT EXISTS {table} ({})", defs.join(", ")))
}

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...]`.
///
/// `["*"]` selects every column. An empty predicate omits the WHERE clause.
pub fn select(
  table: &str,
  columns: &[&str],
  predicate: Option<&Predicate>,
  order_by: Option<&OrderBy>,
) -> Result<Statement> {
  let table = ident(table)?;
  if columns.is_empty() {
    return Err(Error::EmptyColumns(table.to_owned()));
  }
  let columns = columns
    .iter()
    .map(|c| if *c == "*" { Ok("*") } else { ident(c) })
    .collect::<Result<Vec<_>>>()?;

  let mut sql = format!("SELECT {} FROM {table}", columns.join(", "));
  let mut params = Vec::new();

  if let Some(clause) = predicate.map(Predicate::render).transpose()?.flatten() {
    let (where_sql, where_params) = clause.into_parts();
    sql.push_str(" WHERE ");
    sql.push_str(&where_sql);
    params = where_params;
  }

  if let Some(order) = order_by {
    sql.push_str(" ORDER BY ");
    sql.push_str(ident(&order.column)?);
    sql.push_str(if order.descending { " DESC" } else { " ASC" });
  }

  Statement::new(sql, params)
}

/// [`select`] limited to the first row.
pub fn select_first(
  table: &str,
  columns: &[&str],
  predicate: Option<&Predicate>,
  order_by: Option<&OrderBy>,
) -> Result<Statement> {
  let (sql, params) = select(table, columns, predicate, order_by)?.into_parts();
  Statement::new(format!("{sql} LIMIT 1"), params)
}

/// `INSERT INTO <table> (c1, c2) VALUES (?, ?)`, values bound in row order.
pub fn insert(table: &str, row: &Row) -> Result<Statement> {
  let table = ident(table)?;
  if row.is_empty() {
    return Err(Error::EmptyColumns(table.to_owned()));
  }
  let columns = row.columns().map(ident).collect::<Result<Vec<_>>>()?;
  let placeholders = vec!["?"; columns.len()];

  Statement::new(
    format!(
      "INSERT INTO {table} ({}) VALUES ({})",
      columns.join(", "),
      placeholders.join(", "),
    ),
    row.values().cloned().collect(),
  )
}

/// `UPDATE <table> SET c1 = ?, ... WHERE (...)`.
///
/// Bound values are the SET values followed by the predicate values.
pub fn update(table: &str, set: &Row, predicate: &Predicate) -> Result<Statement> {
  let table = ident(table)?;
  if set.is_empty() {
    return Err(Error::EmptyColumns(table.to_owned()));
  }
  let clause = predicate.render()?.ok_or(Error::EmptyPredicate("update"))?;

  let assignments = set
    .columns()
    .map(|c| ident(c).map(|c| format!("{c} = ?")))
    .collect::<Result<Vec<_>>>()?;

  let (where_sql, where_params) = clause.into_parts();
  let mut params: Vec<_> = set.values().cloned().collect();
  params.extend(where_params);

  Statement::new(
    format!("UPDATE {table} SET {} WHERE {where_sql}", assignments.join(", ")),
    params,
  )
}

/// `DELETE FROM <table> WHERE (...)`.
pub fn delete(table: &str, predicate: &Predicate) -> Result<Statement> {
  let table = ident(table)?;
  let clause = predicate.render()?.ok_or(Error::EmptyPredicate("delete"))?;
  let (where_sql, params) = clause.into_parts();
  Statement::new(format!("DELETE FROM {table} WHERE {where_sql}"), params)
}

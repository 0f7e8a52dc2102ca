//! The three-level resource hierarchy shared by every vertical.
//!
//! A vertical is a Root → Child → Leaf chain. Each level is one table with a
//! text `id` primary key and its business fields; Child and Leaf also carry a
//! parent column referencing the level above with `ON DELETE CASCADE`.
//! Everything a vertical needs (DDL, column lists, request validation, the
//! joined leaf read) is derived from a [`VerticalSpec`].

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use uuid::Uuid;

use crate::{
  Error, Result,
  sql::{ColumnType, Reference, ReferentialAction, Statement, TableSchema, ident},
  value::{Row, Value},
};

/// Name of the primary-key column on every level.
pub const ID: &str = "id";

/// A fresh row identifier.
pub fn new_id() -> String { Uuid::new_v4().hyphenated().to_string() }

// ─── Fields ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
  Text,
  Integer,
  Real,
  /// Stored as BLOB, exchanged as a standard base64 string.
  Blob,
}

impl FieldKind {
  pub fn column_type(self) -> ColumnType {
    match self {
      Self::Text => ColumnType::Text,
      Self::Integer => ColumnType::Integer,
      Self::Real => ColumnType::Real,
      Self::Blob => ColumnType::Blob,
    }
  }

  fn expected(self) -> &'static str {
    match self {
      Self::Text => "a string",
      Self::Integer => "an integer",
      Self::Real => "a number",
      Self::Blob => "a base64 string",
    }
  }

  /// Convert a non-null JSON value into this kind's storage class.
  fn coerce(self, field: &str, json: &Json) -> Result<Value> {
    let value = match (self, json) {
      (Self::Text, Json::String(s)) => Some(Value::Text(s.clone())),
      (Self::Integer, Json::Bool(b)) => Some(Value::Integer(i64::from(*b))),
      (Self::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
      (Self::Real, Json::Number(n)) => n.as_f64().map(Value::Real),
      (Self::Blob, Json::String(s)) => Some(Value::Blob(B64.decode(s)?)),
      _ => None,
    };
    value.ok_or_else(|| Error::FieldType { field: field.to_owned(), expected: self.expected() })
  }
}

/// One business column of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
  pub name:     String,
  pub kind:     FieldKind,
  /// Nullable column; may be omitted from request bodies.
  #[serde(default)]
  pub optional: bool,
  #[serde(default)]
  pub unique:   bool,
}

impl FieldSpec {
  pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
    Self { name: name.into(), kind, optional: false, unique: false }
  }

  pub fn text(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Text) }

  pub fn integer(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Integer) }

  pub fn real(name: impl Into<String>) -> Self { Self::new(name, FieldKind::Real) }

  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn unique(mut self) -> Self {
    self.unique = true;
    self
  }

  fn column_types(&self) -> Vec<ColumnType> {
    let mut types = vec![self.kind.column_type()];
    if !self.optional {
      types.push(ColumnType::NotNull);
    }
    if self.unique {
      types.push(ColumnType::Unique);
    }
    types
  }
}

// ─── Levels ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Root,
  Child,
  Leaf,
}

/// One table of a vertical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
  pub table:         String,
  /// Collection name used in routes, e.g. `pharmacies` or `groups`. Leaf
  /// routes go through the child's segment, so on the leaf it only names the
  /// resource in error messages and may be left empty.
  #[serde(default)]
  pub segment:       String,
  /// Column referencing the parent level's `id`. `None` on the root.
  #[serde(default)]
  pub parent_column: Option<String>,
  pub fields:        Vec<FieldSpec>,
}

impl LevelSpec {
  pub fn new(table: impl Into<String>, segment: impl Into<String>) -> Self {
    Self {
      table:         table.into(),
      segment:       segment.into(),
      parent_column: None,
      fields:        Vec::new(),
    }
  }

  pub fn parent(mut self, column: impl Into<String>) -> Self {
    self.parent_column = Some(column.into());
    self
  }

  pub fn field(mut self, field: FieldSpec) -> Self {
    self.fields.push(field);
    self
  }

  /// The segment, or the table name when no segment is set.
  pub fn label(&self) -> &str {
    if self.segment.is_empty() { &self.table } else { &self.segment }
  }

  /// `id`, the business fields, then the parent column.
  pub fn columns(&self) -> Vec<&str> {
    std::iter::once(ID)
      .chain(self.fields.iter().map(|f| f.name.as_str()))
      .chain(self.parent_column.as_deref())
      .collect()
  }

  /// Table DDL; `parent_table` is required for levels with a parent column.
  pub fn schema(&self, parent_table: Option<&str>) -> TableSchema {
    let mut schema = TableSchema::new(&self.table)
      .column(ID, [ColumnType::Text, ColumnType::PrimaryKey]);
    for field in &self.fields {
      schema = schema.column(&field.name, field.column_types());
    }
    if let (Some(column), Some(parent)) = (&self.parent_column, parent_table) {
      schema = schema
        .column(column, [ColumnType::Text, ColumnType::NotNull])
        .reference(
          column,
          Reference::new(parent, ID).on_delete(ReferentialAction::Cascade),
        );
    }
    schema
  }

  /// Validate the business fields of a request body.
  ///
  /// Missing or `null` optional fields become NULL; anything else not listed
  /// in `fields` is ignored.
  pub fn read_fields(&self, body: &Map<String, Json>) -> Result<Row> {
    let mut row = Row::new();
    for field in &self.fields {
      let value = match body.get(&field.name) {
        None | Some(Json::Null) if field.optional => Value::Null,
        None | Some(Json::Null) => return Err(Error::MissingField(field.name.clone())),
        Some(json) => field.kind.coerce(&field.name, json)?,
      };
      row.insert(field.name.clone(), value);
    }
    Ok(row)
  }

  /// A complete row for insertion under `parent_id`.
  pub fn new_row(
    &self,
    id: String,
    parent_id: Option<&str>,
    body: &Map<String, Json>,
  ) -> Result<Row> {
    let mut row = Row::new().with(ID, id);
    for (name, value) in self.read_fields(body)? {
      row.insert(name, value);
    }
    if let Some(column) = &self.parent_column {
      let parent_id = parent_id.ok_or_else(|| Error::MissingField(column.clone()))?;
      row.insert(column.clone(), parent_id);
    }
    Ok(row)
  }

  /// The parent id carried in a body, if the level has a parent column and
  /// the body supplies it.
  pub fn parent_in(&self, body: &Map<String, Json>) -> Result<Option<String>> {
    match &self.parent_column {
      Some(column) => optional_text(body, column),
      None => Ok(None),
    }
  }
}

/// The required `id` of a request body.
pub fn id_in(body: &Map<String, Json>) -> Result<String> {
  optional_text(body, ID)?.ok_or_else(|| Error::MissingField(ID.to_owned()))
}

fn optional_text(body: &Map<String, Json>, key: &str) -> Result<Option<String>> {
  match body.get(key) {
    None | Some(Json::Null) => Ok(None),
    Some(Json::String(s)) => Ok(Some(s.clone())),
    Some(_) => Err(Error::FieldType { field: key.to_owned(), expected: "a string" }),
  }
}

// ─── Vertical ────────────────────────────────────────────────────────────────

/// A complete Root → Child → Leaf hierarchy mounted under `/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerticalSpec {
  pub name:  String,
  pub root:  LevelSpec,
  pub child: LevelSpec,
  pub leaf:  LevelSpec,
}

impl VerticalSpec {
  pub fn level(&self, level: Level) -> &LevelSpec {
    match level {
      Level::Root => &self.root,
      Level::Child => &self.child,
      Level::Leaf => &self.leaf,
    }
  }

  pub fn parent_of(&self, level: Level) -> Option<&LevelSpec> {
    match level {
      Level::Root => None,
      Level::Child => Some(&self.root),
      Level::Leaf => Some(&self.child),
    }
  }

  /// Root, child and leaf DDL, in creation order.
  pub fn schemas(&self) -> [TableSchema; 3] {
    [
      self.root.schema(None),
      self.child.schema(Some(&self.root.table)),
      self.leaf.schema(Some(&self.child.table)),
    ]
  }

  pub fn tables(&self) -> [&str; 3] {
    [&self.root.table, &self.child.table, &self.leaf.table]
  }

  /// Leaf rows of `child_id`, which must itself belong to `root_id`.
  pub fn leaf_query(&self, root_id: &str, child_id: &str) -> Result<Statement> {
    let leaf_parent = self.required_parent(Level::Leaf)?;
    let child_parent = self.required_parent(Level::Child)?;
    let columns = self
      .leaf
      .columns()
      .into_iter()
      .map(|c| ident(c).map(|c| format!("l.{c} AS {c}")))
      .collect::<Result<Vec<_>>>()?;

    Statement::new(
      format!(
        "SELECT {} FROM {} AS l JOIN {} AS c ON c.{ID} = l.{} WHERE c.{} = ? AND c.{ID} = ?",
        columns.join(", "),
        ident(&self.leaf.table)?,
        ident(&self.child.table)?,
        ident(leaf_parent)?,
        ident(child_parent)?,
      ),
      vec![Value::from(root_id), Value::from(child_id)],
    )
  }

  fn required_parent(&self, level: Level) -> Result<&str> {
    self.level(level).parent_column.as_deref().ok_or_else(|| {
      Error::InvalidVertical(format!("{}: {:?} level has no parent column", self.name, level))
    })
  }

  /// Check identifiers and the shape of the chain.
  pub fn validate(&self) -> Result<()> {
    let invalid = |msg: String| Error::InvalidVertical(format!("{}: {msg}", self.name));

    ident(&self.name).map_err(|_| invalid("name is not an identifier".into()))?;

    if self.root.parent_column.is_some() {
      return Err(invalid("root level cannot have a parent column".into()));
    }
    self.required_parent(Level::Child)?;
    self.required_parent(Level::Leaf)?;

    if self.root.segment == self.child.segment {
      return Err(invalid(format!("segment {:?} used twice", self.root.segment)));
    }

    let mut segments = vec![&self.root.segment, &self.child.segment];
    if !self.leaf.segment.is_empty() {
      segments.push(&self.leaf.segment);
    }
    for segment in segments {
      ident(segment).map_err(|_| invalid(format!("bad segment {segment:?}")))?;
    }

    let mut tables = HashSet::new();
    for level in [&self.root, &self.child, &self.leaf] {
      ident(&level.table).map_err(|_| invalid(format!("bad table {:?}", level.table)))?;
      if !tables.insert(level.table.as_str()) {
        return Err(invalid(format!("table {:?} used twice", level.table)));
      }
      if level.fields.is_empty() {
        return Err(invalid(format!("{}: no business fields", level.table)));
      }

      let mut columns = HashSet::new();
      for column in level.columns() {
        ident(column).map_err(|_| invalid(format!("{}: bad column {column:?}", level.table)))?;
        if !columns.insert(column) {
          return Err(invalid(format!("{}: column {column:?} declared twice", level.table)));
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::sql::build;

  fn pharmacy() -> VerticalSpec {
    VerticalSpec {
      name:  "pharmacy".into(),
      root:  LevelSpec::new("pharmacies", "pharmacies").field(FieldSpec::text("name").unique()),
      child: LevelSpec::new("medication_groups", "groups")
        .parent("pharmacy_id")
        .field(FieldSpec::text("name").unique()),
      leaf:  LevelSpec::new("medications", "medications")
        .parent("medication_group_id")
        .field(FieldSpec::text("name"))
        .field(FieldSpec::real("price"))
        .field(FieldSpec::text("description").optional()),
    }
  }

  fn body(v: serde_json::Value) -> Map<String, Json> {
    match v {
      Json::Object(m) => m,
      _ => unreachable!(),
    }
  }

  #[test]
  fn child_schema_references_root_with_cascade() {
    let [_, child, _] = pharmacy().schemas();
    let sql = build::create_table(&child).unwrap();
    assert_eq!(
      sql.sql(),
      "CREATE TABLE IF NOT EXISTS medication_groups (id TEXT PRIMARY KEY, \
       name TEXT NOT NULL UNIQUE, pharmacy_id TEXT NOT NULL, \
       FOREIGN KEY (pharmacy_id) REFERENCES pharmacies (id) ON DELETE CASCADE)"
    );
  }

  #[test]
  fn columns_put_parent_last() {
    let v = pharmacy();
    assert_eq!(
      v.leaf.columns(),
      ["id", "name", "price", "description", "medication_group_id"]
    );
  }

  #[test]
  fn new_row_fills_id_fields_and_parent() {
    let v = pharmacy();
    let row = v
      .leaf
      .new_row("m1".into(), Some("g1"), &body(json!({"name": "Aspirin", "price": 3})))
      .unwrap();
    assert_eq!(row.get("id"), Some(&Value::from("m1")));
    assert_eq!(row.get("price"), Some(&Value::Real(3.0)));
    assert_eq!(row.get("description"), Some(&Value::Null));
    assert_eq!(row.get("medication_group_id"), Some(&Value::from("g1")));
  }

  #[test]
  fn missing_required_field_is_rejected() {
    let v = pharmacy();
    let err = v.leaf.read_fields(&body(json!({"name": "Aspirin"}))).unwrap_err();
    assert!(matches!(err, Error::MissingField(f) if f == "price"));
  }

  #[test]
  fn wrong_json_type_is_rejected() {
    let v = pharmacy();
    let err = v
      .leaf
      .read_fields(&body(json!({"name": 5, "price": 1.5})))
      .unwrap_err();
    assert!(matches!(err, Error::FieldType { field, .. } if field == "name"));
  }

  #[test]
  fn integer_fields_accept_booleans() {
    let level = LevelSpec::new("dishes", "dishes").field(FieldSpec::integer("is_spicy"));
    let row = level.read_fields(&body(json!({"is_spicy": true}))).unwrap();
    assert_eq!(row.get("is_spicy"), Some(&Value::Integer(1)));
  }

  #[test]
  fn leaf_query_binds_both_ancestors() {
    let stmt = pharmacy().leaf_query("p1", "g1").unwrap();
    assert_eq!(
      stmt.sql(),
      "SELECT l.id AS id, l.name AS name, l.price AS price, \
       l.description AS description, l.medication_group_id AS medication_group_id \
       FROM medications AS l JOIN medication_groups AS c ON c.id = l.medication_group_id \
       WHERE c.pharmacy_id = ? AND c.id = ?"
    );
    assert_eq!(stmt.params(), &[Value::from("p1"), Value::from("g1")]);
  }

  #[test]
  fn id_and_parent_extraction() {
    let v = pharmacy();
    let b = body(json!({"id": "g1", "pharmacy_id": "p1", "name": "x"}));
    assert_eq!(id_in(&b).unwrap(), "g1");
    assert_eq!(v.child.parent_in(&b).unwrap().as_deref(), Some("p1"));
    assert_eq!(v.root.parent_in(&b).unwrap(), None);
    assert!(matches!(id_in(&body(json!({}))), Err(Error::MissingField(_))));
  }

  #[test]
  fn validate_accepts_well_formed_vertical() {
    pharmacy().validate().unwrap();
  }

  #[test]
  fn validate_rejects_level_without_fields() {
    let mut v = pharmacy();
    v.root.fields.clear();
    let err = v.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidVertical(m) if m.contains("no business fields")));
  }

  #[test]
  fn leaf_segment_is_optional() {
    let mut v: VerticalSpec = serde_json::from_value(json!({
      "name": "library",
      "root": { "table": "libraries", "segment": "libraries",
                "fields": [{ "name": "name", "kind": "text" }] },
      "child": { "table": "shelves", "segment": "shelves", "parent_column": "library_id",
                 "fields": [{ "name": "label", "kind": "text" }] },
      "leaf": { "table": "books", "parent_column": "shelf_id",
                "fields": [{ "name": "title", "kind": "text" }] }
    }))
    .unwrap();
    v.validate().unwrap();
    assert_eq!(v.leaf.label(), "books");

    v.leaf.segment = "bad segment".into();
    assert!(v.validate().is_err());
  }

  #[test]
  fn validate_rejects_field_named_like_parent() {
    let mut v = pharmacy();
    v.child.fields.push(FieldSpec::text("pharmacy_id"));
    assert!(matches!(v.validate(), Err(Error::InvalidVertical(_))));
  }

  #[test]
  fn validate_rejects_root_with_parent() {
    let mut v = pharmacy();
    v.root.parent_column = Some("x_id".into());
    assert!(matches!(v.validate(), Err(Error::InvalidVertical(_))));
  }

  #[test]
  fn validate_rejects_shared_segment() {
    let mut v = pharmacy();
    v.child.segment = "pharmacies".into();
    assert!(v.validate().is_err());
  }

  #[test]
  fn vertical_deserialises_from_config_shape() {
    let v: VerticalSpec = serde_json::from_value(json!({
      "name": "library",
      "root":  { "table": "libraries", "segment": "libraries",
                 "fields": [{ "name": "name", "kind": "text", "unique": true }] },
      "child": { "table": "shelves", "segment": "shelves", "parent_column": "library_id",
                 "fields": [{ "name": "name", "kind": "text" }] },
      "leaf":  { "table": "books", "segment": "books", "parent_column": "shelf_id",
                 "fields": [{ "name": "title", "kind": "text" },
                            { "name": "pages", "kind": "integer", "optional": true }] }
    }))
    .unwrap();
    v.validate().unwrap();
    assert!(v.leaf.fields[1].optional);
  }
}

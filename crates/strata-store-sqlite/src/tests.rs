//! Integration tests for `SqliteStore` against an in-memory database.

use strata_core::{
  ErrorKind, RecordStore, Row, StoreError, Value,
  catalog,
  hierarchy::{FieldSpec, LevelSpec, VerticalSpec},
  sql::{
    ColumnType::*, OrderBy, Predicate, Reference, ReferentialAction, Statement, TableSchema,
  },
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn services() -> TableSchema {
  TableSchema::new("services")
    .column("id", [Text, PrimaryKey])
    .column("name", [Text, NotNull, Unique])
}

fn stores() -> TableSchema {
  TableSchema::new("stores")
    .column("id", [Text, PrimaryKey])
    .column("name", [Text, NotNull, Unique])
    .column("service_id", [Text, NotNull])
    .reference(
      "service_id",
      Reference::new("services", "id").on_delete(ReferentialAction::Cascade),
    )
}

async fn with_tables() -> SqliteStore {
  let s = store().await;
  s.create_table(&services()).await.unwrap();
  s.create_table(&stores()).await.unwrap();
  s
}

fn by_id(id: &str) -> Predicate { Predicate::eq("id", id) }

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_table_is_idempotent() {
  let s = store().await;
  s.create_table(&services()).await.unwrap();
  s.create_table(&services()).await.unwrap();
  assert!(s.table_exists("services").await.unwrap());
}

#[tokio::test]
async fn table_exists_false_for_unknown_table() {
  let s = store().await;
  assert!(!s.table_exists("nothing_here").await.unwrap());
}

// ─── Reads and writes ────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_then_select_one_by_unique_column() {
  let s = with_tables().await;
  let row = Row::new().with("id", "s1").with("name", "Fast Food Co");
  s.insert("services", &row).await.unwrap();

  let found = s
    .select_one("services", &["*"], Some(&Predicate::eq("name", "Fast Food Co")), None)
    .await
    .unwrap()
    .expect("row");
  assert_eq!(found, row);
}

#[tokio::test]
async fn select_one_with_no_match_is_none() {
  let s = with_tables().await;
  let found = s.select_one("services", &["*"], Some(&by_id("missing")), None).await.unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn select_many_without_predicate_returns_all_ordered() {
  let s = with_tables().await;
  for (id, name) in [("s1", "Beta"), ("s2", "Alpha"), ("s3", "Gamma")] {
    s.insert("services", &Row::new().with("id", id).with("name", name))
      .await
      .unwrap();
  }

  let rows = s
    .select_many("services", &["name"], None, Some(&OrderBy::asc("name")))
    .await
    .unwrap();
  let names: Vec<_> = rows.iter().filter_map(|r| r.get("name")?.as_text()).collect();
  assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn rows_keep_selected_column_order() {
  let s = with_tables().await;
  s.insert("services", &Row::new().with("id", "s1").with("name", "Acme"))
    .await
    .unwrap();
  let rows = s.select_many("services", &["name", "id"], None, None).await.unwrap();
  assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["name", "id"]);
}

#[tokio::test]
async fn quote_breaking_values_are_stored_verbatim() {
  let s = with_tables().await;
  let nasty = "x\" OR 1=1; DROP TABLE services; --";
  s.insert("services", &Row::new().with("id", "s1").with("name", nasty))
    .await
    .unwrap();

  assert!(s.table_exists("services").await.unwrap());
  let found = s
    .select_one("services", &["name"], Some(&Predicate::eq("name", nasty)), None)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.get("name"), Some(&Value::from(nasty)));
}

#[tokio::test]
async fn update_changes_fields_and_reports_rows() {
  let s = with_tables().await;
  s.insert("services", &Row::new().with("id", "s1").with("name", "Old"))
    .await
    .unwrap();

  let n = s
    .update("services", &Row::new().with("name", "New"), &by_id("s1"))
    .await
    .unwrap();
  assert_eq!(n, 1);

  let n = s
    .update("services", &Row::new().with("name", "Other"), &by_id("nope"))
    .await
    .unwrap();
  assert_eq!(n, 0);

  let row = s.select_one("services", &["name"], Some(&by_id("s1")), None).await.unwrap().unwrap();
  assert_eq!(row.get("name"), Some(&Value::from("New")));
}

#[tokio::test]
async fn update_without_predicate_is_invalid() {
  let s = with_tables().await;
  let err = s
    .update("services", &Row::new().with("name", "All"), &Predicate::new())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Invalid);
}

#[tokio::test]
async fn delete_reports_rows() {
  let s = with_tables().await;
  s.insert("services", &Row::new().with("id", "s1").with("name", "A"))
    .await
    .unwrap();
  assert_eq!(s.delete("services", &by_id("s1")).await.unwrap(), 1);
  assert_eq!(s.delete("services", &by_id("s1")).await.unwrap(), 0);
}

#[tokio::test]
async fn query_with_or_branch() {
  let s = with_tables().await;
  for (id, name) in [("s1", "A"), ("s2", "B"), ("s3", "C")] {
    s.insert("services", &Row::new().with("id", id).with("name", name))
      .await
      .unwrap();
  }
  let p = Predicate::new()
    .or(Statement::new("name = ?", vec![Value::from("A")]).unwrap())
    .or(Statement::new("name = ?", vec![Value::from("C")]).unwrap());
  let rows = s.select_many("services", &["id"], Some(&p), Some(&OrderBy::asc("id"))).await.unwrap();
  assert_eq!(rows.len(), 2);
}

// ─── Constraints ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unique_violation_is_a_constraint_error() {
  let s = with_tables().await;
  s.insert("services", &Row::new().with("id", "s1").with("name", "Dup"))
    .await
    .unwrap();
  let err = s
    .insert("services", &Row::new().with("id", "s2").with("name", "Dup"))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Constraint);
}

#[tokio::test]
async fn foreign_keys_are_enforced() {
  let s = with_tables().await;
  let err = s
    .insert(
      "stores",
      &Row::new().with("id", "st1").with("name", "Orphan").with("service_id", "ghost"),
    )
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Constraint);
}

#[tokio::test]
async fn missing_table_is_classified() {
  let s = store().await;
  let err = s.select_many("ghosts", &["*"], None, None).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::MissingTable);
}

#[tokio::test]
async fn delete_root_cascades_to_children() {
  let s = with_tables().await;
  s.insert("services", &Row::new().with("id", "s1").with("name", "Acme"))
    .await
    .unwrap();
  s.insert(
    "stores",
    &Row::new().with("id", "st1").with("name", "Branch1").with("service_id", "s1"),
  )
  .await
  .unwrap();

  s.delete("services", &by_id("s1")).await.unwrap();
  let left = s.select_many("stores", &["*"], None, None).await.unwrap();
  assert!(left.is_empty());
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

async fn install(s: &SqliteStore, v: &VerticalSpec) {
  for schema in v.schemas() {
    s.create_table(&schema).await.unwrap();
  }
}

#[tokio::test]
async fn every_builtin_vertical_installs_twice() {
  let s = store().await;
  for v in catalog::all() {
    install(&s, &v).await;
    install(&s, &v).await;
    for table in v.tables() {
      assert!(s.table_exists(table).await.unwrap(), "{table}");
    }
  }
}

#[tokio::test]
async fn leaf_query_is_scoped_to_both_ancestors() {
  let s = store().await;
  let v = catalog::find("delivery").unwrap();
  install(&s, &v).await;

  let root = Row::new().with("id", "r1").with("name", "Svc");
  let other_root = Row::new().with("id", "r2").with("name", "Svc2");
  let child = Row::new().with("id", "c1").with("name", "Store").with("service_id", "r1");
  let order = Row::new()
    .with("id", "o1")
    .with("title", "Pizza")
    .with("date", "2024-01-01")
    .with("amount", 2_i64)
    .with("store_id", "c1");
  s.insert("delivery_service", &root).await.unwrap();
  s.insert("delivery_service", &other_root).await.unwrap();
  s.insert("store", &child).await.unwrap();
  s.insert("orders", &order).await.unwrap();

  let rows = s.query(v.leaf_query("r1", "c1").unwrap()).await.unwrap();
  assert_eq!(rows, vec![order]);

  let rows = s.query(v.leaf_query("r2", "c1").unwrap()).await.unwrap();
  assert!(rows.is_empty());
}

fn body(json: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
  json.as_object().cloned().unwrap()
}

async fn count(s: &SqliteStore, table: &str) -> usize {
  s.select_many(table, &["id"], None, None).await.unwrap().len()
}

/// One depot, one route and one transport, built through the level specs.
async fn transport_chain(s: &SqliteStore) {
  let v = catalog::find("transport").unwrap();
  install(s, &v).await;

  let depot = v.root.new_row("d1".into(), None, &body(serde_json::json!({ "name": "North" })));
  let route = v.child.new_row("r1".into(), Some("d1"), &body(serde_json::json!({ "name": "5A" })));
  let transport = v.leaf.new_row(
    "t1".into(),
    Some("r1"),
    &body(serde_json::json!({ "number": "5", "departure_time": "08:00", "return_time": 17 })),
  );
  s.insert("depots", &depot.unwrap()).await.unwrap();
  s.insert("routes", &route.unwrap()).await.unwrap();
  s.insert("transports", &transport.unwrap()).await.unwrap();
}

#[tokio::test]
async fn delete_root_cascades_through_every_level() {
  let s = store().await;
  transport_chain(&s).await;
  assert_eq!(count(&s, "transports").await, 1);

  assert_eq!(s.delete("depots", &by_id("d1")).await.unwrap(), 1);
  assert_eq!(count(&s, "routes").await, 0);
  assert_eq!(count(&s, "transports").await, 0);
}

#[tokio::test]
async fn delete_child_cascades_to_leaves_only() {
  let s = store().await;
  transport_chain(&s).await;

  assert_eq!(s.delete("routes", &by_id("r1")).await.unwrap(), 1);
  assert_eq!(count(&s, "transports").await, 0);
  assert_eq!(count(&s, "depots").await, 1);
}

#[tokio::test]
async fn blob_and_optional_fields_round_trip() {
  let s = store().await;
  let v = VerticalSpec {
    name:  "archive".into(),
    root:  LevelSpec::new("archives", "archives").field(FieldSpec::text("name").unique()),
    child: LevelSpec::new("boxes", "boxes").parent("archive_id").field(FieldSpec::text("name")),
    leaf:  LevelSpec::new("scans", "scans")
      .parent("box_id")
      .field(FieldSpec::new("image", strata_core::hierarchy::FieldKind::Blob))
      .field(FieldSpec::text("note").optional()),
  };
  v.validate().unwrap();
  install(&s, &v).await;

  s.insert("archives", &Row::new().with("id", "a").with("name", "A")).await.unwrap();
  s.insert("boxes", &Row::new().with("id", "b").with("name", "B").with("archive_id", "a"))
    .await
    .unwrap();

  let body = serde_json::json!({ "image": "AAEC" });
  let row = v
    .leaf
    .new_row("s1".into(), Some("b"), body.as_object().unwrap())
    .unwrap();
  s.insert("scans", &row).await.unwrap();

  let found = s.select_one("scans", &["*"], Some(&by_id("s1")), None).await.unwrap().unwrap();
  assert_eq!(found.get("image"), Some(&Value::Blob(vec![0, 1, 2])));
  assert_eq!(found.get("note"), Some(&Value::Null));
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn closed_store_reports_connection_errors() {
  let s = with_tables().await;
  let clone = s.clone();
  s.close().await.unwrap();
  let err = clone.select_many("services", &["*"], None, None).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Connection);
}

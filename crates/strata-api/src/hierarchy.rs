//! Generic handlers for one vertical's Root → Child → Leaf hierarchy.
//!
//! With `<roots>` and `<children>` standing for the vertical's collection
//! segments:
//!
//! | Method   | Path                              | Notes |
//! |----------|-----------------------------------|-------|
//! | `GET`    | `/<roots>`                        | |
//! | `POST`   | `/<roots>`                        | 201 + created row |
//! | `PUT`    | `/<roots>`                        | body carries `id`; 404 if absent |
//! | `DELETE` | `/<roots>/{id}`                   | 204; cascades |
//! | `GET`    | `/{root_id}/<children>`           | |
//! | `POST`   | `/<children>`                     | body carries parent id; 404 if parent absent |
//! | `PUT`    | `/<children>`                     | |
//! | `DELETE` | `/<children>/{id}`                | 204; cascades |
//! | `GET`    | `/{root_id}/{child_id}`           | leaves joined through the child |
//! | `POST`   | `/<children>/{child_id}`          | create leaf under child |
//! | `PUT`    | `/<children>/{child_id}`          | update leaf scoped to child |
//! | `DELETE` | `/<children>/{child_id}/{leaf_id}`| 204 |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State},
  http::StatusCode,
  routing::{delete, get, post},
};
use serde_json::{Map, Value as JsonValue};
use strata_core::{
  RecordStore, Row,
  hierarchy::{ID, Level, VerticalSpec, id_in, new_id},
  sql::Predicate,
};

use crate::error::ApiError;

type Body = Map<String, JsonValue>;

// ─── State ───────────────────────────────────────────────────────────────────

pub struct VerticalState<S> {
  pub store: Arc<S>,
  pub spec:  Arc<VerticalSpec>,
}

impl<S> Clone for VerticalState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), spec: Arc::clone(&self.spec) }
  }
}

/// Routes for `spec`, to be nested under `/<spec.name>`.
pub fn router<S>(store: Arc<S>, spec: VerticalSpec) -> Router<()>
where
  S: RecordStore + 'static,
{
  let roots = format!("/{}", spec.root.segment);
  let children = format!("/{}", spec.child.segment);

  Router::new()
    .route(
      &roots,
      get(list_roots::<S>).post(create_root::<S>).put(update_root::<S>),
    )
    .route(&format!("{roots}/{{id}}"), delete(delete_root::<S>))
    .route(&format!("/{{root_id}}{children}"), get(list_children::<S>))
    .route(&children, post(create_child::<S>).put(update_child::<S>))
    .route(
      &format!("{children}/{{id}}"),
      delete(delete_child::<S>)
        .post(create_leaf::<S>)
        .put(update_leaf::<S>),
    )
    .route("/{root_id}/{id}", get(list_leaves::<S>))
    .route(&format!("{children}/{{id}}/{{leaf_id}}"), delete(delete_leaf::<S>))
    .with_state(VerticalState { store, spec: Arc::new(spec) })
}

// ─── Roots ───────────────────────────────────────────────────────────────────

pub async fn list_roots<S: RecordStore>(
  State(state): State<VerticalState<S>>,
) -> Result<Json<Vec<Row>>, ApiError> {
  list(&state, Level::Root, None).await
}

pub async fn create_root<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Json(body): Json<Body>,
) -> Result<(StatusCode, Json<Row>), ApiError> {
  create(&state, Level::Root, None, &body).await
}

pub async fn update_root<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Json(body): Json<Body>,
) -> Result<Json<Row>, ApiError> {
  update(&state, Level::Root, None, &body).await
}

pub async fn delete_root<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  remove(&state, Level::Root, id, None).await
}

// ─── Children ────────────────────────────────────────────────────────────────

pub async fn list_children<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path(root_id): Path<String>,
) -> Result<Json<Vec<Row>>, ApiError> {
  list(&state, Level::Child, Some(root_id)).await
}

pub async fn create_child<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Json(body): Json<Body>,
) -> Result<(StatusCode, Json<Row>), ApiError> {
  let parent = parent_from_body(&state.spec, Level::Child, &body)?;
  create(&state, Level::Child, Some(parent), &body).await
}

/// The parent column in the body, when present, narrows the match.
pub async fn update_child<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Json(body): Json<Body>,
) -> Result<Json<Row>, ApiError> {
  let scope = state.spec.child.parent_in(&body)?;
  update(&state, Level::Child, scope, &body).await
}

pub async fn delete_child<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  remove(&state, Level::Child, id, None).await
}

// ─── Leaves ──────────────────────────────────────────────────────────────────

pub async fn list_leaves<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path((root_id, child_id)): Path<(String, String)>,
) -> Result<Json<Vec<Row>>, ApiError> {
  let statement = state.spec.leaf_query(&root_id, &child_id)?;
  let rows = state.store.query(statement).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

pub async fn create_leaf<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path(child_id): Path<String>,
  Json(body): Json<Body>,
) -> Result<(StatusCode, Json<Row>), ApiError> {
  create(&state, Level::Leaf, Some(child_id), &body).await
}

pub async fn update_leaf<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path(child_id): Path<String>,
  Json(body): Json<Body>,
) -> Result<Json<Row>, ApiError> {
  update(&state, Level::Leaf, Some(child_id), &body).await
}

pub async fn delete_leaf<S: RecordStore>(
  State(state): State<VerticalState<S>>,
  Path((child_id, leaf_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
  remove(&state, Level::Leaf, leaf_id, Some(child_id)).await
}

// ─── Shared ──────────────────────────────────────────────────────────────────

fn parent_from_body(spec: &VerticalSpec, level: Level, body: &Body) -> Result<String, ApiError> {
  let spec = spec.level(level);
  spec.parent_in(body)?.ok_or_else(|| {
    let column = spec.parent_column.as_deref().unwrap_or(ID);
    ApiError::from(strata_core::Error::MissingField(column.to_owned()))
  })
}

/// `id = ?`, plus `<parent column> = ?` when `parent` is given.
fn scoped(spec: &VerticalSpec, level: Level, id: String, parent: Option<String>) -> Predicate {
  let predicate = Predicate::eq(ID, id);
  match (&spec.level(level).parent_column, parent) {
    (Some(column), Some(parent)) => predicate.and(column.clone(), parent),
    _ => predicate,
  }
}

async fn list<S: RecordStore>(
  state: &VerticalState<S>,
  level: Level,
  parent: Option<String>,
) -> Result<Json<Vec<Row>>, ApiError> {
  let spec = state.spec.level(level);
  let predicate = match (&spec.parent_column, parent) {
    (Some(column), Some(parent)) => Predicate::eq(column.clone(), parent),
    _ => Predicate::new(),
  };
  let rows = state
    .store
    .select_many(&spec.table, &spec.columns(), Some(&predicate), None)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

async fn fetch<S: RecordStore>(
  state: &VerticalState<S>,
  level: Level,
  id: &str,
) -> Result<Option<Row>, ApiError> {
  let spec = state.spec.level(level);
  state
    .store
    .select_one(&spec.table, &spec.columns(), Some(&Predicate::eq(ID, id)), None)
    .await
    .map_err(ApiError::store)
}

async fn create<S: RecordStore>(
  state: &VerticalState<S>,
  level: Level,
  parent: Option<String>,
  body: &Body,
) -> Result<(StatusCode, Json<Row>), ApiError> {
  let spec = state.spec.level(level);

  if let (Some(parent_level), Some(parent_id)) = (state.spec.parent_of(level), &parent) {
    let parent_key = Predicate::eq(ID, parent_id.as_str());
    let found = state
      .store
      .select_one(&parent_level.table, &[ID], Some(&parent_key), None)
      .await
      .map_err(ApiError::store)?;
    if found.is_none() {
      return Err(ApiError::NotFound(format!(
        "{} {parent_id} not found",
        parent_level.label()
      )));
    }
  }

  let row = spec.new_row(new_id(), parent.as_deref(), body)?;
  state.store.insert(&spec.table, &row).await.map_err(ApiError::store)?;
  tracing::debug!(table = %spec.table, id = ?row.get(ID), "created");
  Ok((StatusCode::CREATED, Json(row)))
}

/// Replace the business fields of the row named by the body's `id`. The id
/// and parent column are never part of the SET list.
async fn update<S: RecordStore>(
  state: &VerticalState<S>,
  level: Level,
  parent: Option<String>,
  body: &Body,
) -> Result<Json<Row>, ApiError> {
  let spec = state.spec.level(level);
  let id = id_in(body)?;
  let set = spec.read_fields(body)?;

  let predicate = scoped(&state.spec, level, id.clone(), parent);
  let changed = state
    .store
    .update(&spec.table, &set, &predicate)
    .await
    .map_err(ApiError::store)?;
  if changed == 0 {
    return Err(ApiError::NotFound(format!("{} {id} not found", spec.label())));
  }

  let row = fetch(state, level, &id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("{} {id} not found", spec.label())))?;
  Ok(Json(row))
}

async fn remove<S: RecordStore>(
  state: &VerticalState<S>,
  level: Level,
  id: String,
  parent: Option<String>,
) -> Result<StatusCode, ApiError> {
  let spec = state.spec.level(level);
  let predicate = scoped(&state.spec, level, id.clone(), parent);
  let deleted = state
    .store
    .delete(&spec.table, &predicate)
    .await
    .map_err(ApiError::store)?;
  if deleted == 0 {
    return Err(ApiError::NotFound(format!("{} {id} not found", spec.label())));
  }
  Ok(StatusCode::NO_CONTENT)
}

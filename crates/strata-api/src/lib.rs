//! JSON REST API for Strata.
//!
//! Exposes an axum [`Router`] backed by any [`strata_core::RecordStore`]: one
//! nested router per vertical plus `/auth`. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! strata_api::install(&*store, &verticals).await?;
//! let app = strata_api::api_router(store.clone(), &verticals);
//! ```

pub mod auth;
pub mod error;
pub mod hierarchy;

use std::{collections::HashSet, sync::Arc};

use axum::{Json, Router, routing::get};
use serde_json::json;
use strata_core::{RecordStore, hierarchy::VerticalSpec};

pub use error::ApiError;

/// Vertical names that would collide with other mounts.
const RESERVED_NAMES: [&str; 1] = ["auth"];

/// Validate each vertical and check that names and tables do not collide with
/// each other or with the `/auth` vertical.
pub fn check_verticals(verticals: &[VerticalSpec]) -> strata_core::Result<()> {
  let invalid = |msg: String| strata_core::Error::InvalidVertical(msg);

  let mut names = HashSet::new();
  let mut tables = HashSet::from([auth::USERS]);
  for v in verticals {
    v.validate()?;
    if RESERVED_NAMES.contains(&v.name.as_str()) {
      return Err(invalid(format!("{}: name is reserved", v.name)));
    }
    if !names.insert(v.name.as_str()) {
      return Err(invalid(format!("{}: declared twice", v.name)));
    }
    for table in v.tables() {
      if !tables.insert(table) {
        return Err(invalid(format!("{}: table {table:?} already in use", v.name)));
      }
    }
  }
  Ok(())
}

/// Create every table the API needs. Safe to run on every start.
pub async fn install<S: RecordStore>(
  store: &S,
  verticals: &[VerticalSpec],
) -> Result<(), S::Error> {
  store.create_table(&auth::users_schema()).await?;
  for v in verticals {
    for schema in v.schemas() {
      store.create_table(&schema).await?;
    }
    tracing::info!(vertical = %v.name, "tables ready");
  }
  Ok(())
}

/// Build the API router for `store`: `GET /`, `/auth` and one nested router
/// per vertical.
///
/// Call [`check_verticals`] first; overlapping mounts make axum panic.
pub fn api_router<S>(store: Arc<S>, verticals: &[VerticalSpec]) -> Router<()>
where
  S: RecordStore + 'static,
{
  let names: Vec<String> = verticals.iter().map(|v| v.name.clone()).collect();
  let welcome = move || {
    let names = names.clone();
    async move {
      Json(json!({
        "message": "Welcome to Strata",
        "verticals": names,
      }))
    }
  };

  verticals.iter().fold(
    Router::new()
      .route("/", get(welcome))
      .nest("/auth", auth::router(Arc::clone(&store))),
    |router, v| {
      router.nest(
        &format!("/{}", v.name),
        hierarchy::router(Arc::clone(&store), v.clone()),
      )
    },
  )
}

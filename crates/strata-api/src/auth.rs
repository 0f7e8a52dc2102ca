//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/registration` | 201; 409 if the login is taken |
//! | `POST` | `/auth/login` | 401 on unknown login or wrong password |
//!
//! Passwords are stored as argon2 PHC strings and never leave the server.

use std::sync::Arc;

use argon2::{
  Argon2,
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::Utc;
use rand_core::OsRng;
use serde::Deserialize;
use strata_core::{
  RecordStore, Row,
  hierarchy::{ID, new_id},
  sql::{ColumnType::*, Predicate, TableSchema},
};

use crate::error::ApiError;

pub const USERS: &str = "users";

const PUBLIC_COLUMNS: [&str; 5] = [ID, "name", "surname", "login", "created_at"];

pub fn users_schema() -> TableSchema {
  TableSchema::new(USERS)
    .column(ID, [Text, PrimaryKey])
    .column("name", [Text, NotNull])
    .column("surname", [Text])
    .column("login", [Text, NotNull, Unique])
    .column("password", [Text, NotNull])
    .column("created_at", [Text])
}

pub fn router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/registration", post(register::<S>))
    .route("/login", post(login::<S>))
    .with_state(store)
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Registration {
  pub name:     String,
  #[serde(default)]
  pub surname:  Option<String>,
  pub login:    String,
  pub password: String,
}

/// `POST /auth/registration`
pub async fn register<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<Registration>,
) -> Result<(StatusCode, Json<Row>), ApiError> {
  if body.login.is_empty() || body.password.is_empty() {
    return Err(ApiError::BadRequest("login and password must not be empty".into()));
  }

  let by_login = Predicate::eq("login", body.login.as_str());
  let taken = store
    .select_one(USERS, &[ID], Some(&by_login), None)
    .await
    .map_err(ApiError::store)?;
  if taken.is_some() {
    return Err(ApiError::Conflict(format!("login {:?} is already registered", body.login)));
  }

  let id = new_id();
  let row = Row::new()
    .with(ID, id.clone())
    .with("name", body.name)
    .with("surname", body.surname)
    .with("login", body.login)
    .with("password", hash_password(&body.password)?)
    .with("created_at", Utc::now().to_rfc3339());
  store.insert(USERS, &row).await.map_err(ApiError::store)?;
  tracing::info!(user = %id, "registered user");

  let user = store
    .select_one(USERS, &PUBLIC_COLUMNS, Some(&Predicate::eq(ID, id.as_str())), None)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Internal(format!("user {id} vanished after insert")))?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub login:    String,
  pub password: String,
}

/// `POST /auth/login`: returns the user on success.
pub async fn login<S: RecordStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<Credentials>,
) -> Result<Json<Row>, ApiError> {
  let rejected = || ApiError::Unauthorized("invalid login or password".into());

  let mut columns = PUBLIC_COLUMNS.to_vec();
  columns.push("password");
  let mut user = store
    .select_one(USERS, &columns, Some(&Predicate::eq("login", body.login.as_str())), None)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(rejected)?;

  let stored = user.remove("password");
  let hash = stored.as_ref().and_then(|v| v.as_text()).ok_or_else(rejected)?;
  if !verify_password(&body.password, hash) {
    return Err(rejected());
  }
  Ok(Json(user))
}

// ─── Hashing ─────────────────────────────────────────────────────────────────

fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// False for a wrong password and for a malformed stored hash.
fn verify_password(password: &str, stored: &str) -> bool {
  PasswordHash::new(stored)
    .is_ok_and(|hash| Argon2::default().verify_password(password.as_bytes(), &hash).is_ok())
}

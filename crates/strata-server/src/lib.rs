//! HTTP service assembly for Strata.
//!
//! Loads [`ServerConfig`], resolves which verticals to mount, and wraps the
//! [`strata_api`] router with tracing and CORS layers.

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::Router;
use serde::Deserialize;
use strata_core::{RecordStore, catalog, hierarchy::VerticalSpec};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Prefix for environment overrides, e.g. `STRATA_PORT=9000`.
pub const ENV_PREFIX: &str = "STRATA";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Built-in verticals to mount. Empty mounts the whole catalog.
  pub verticals:        Vec<String>,
  /// Additional verticals declared in full.
  pub extra_verticals:  Vec<VerticalSpec>,
  pub allow_any_origin: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8000,
      store_path:       PathBuf::from("strata.db"),
      verticals:        Vec::new(),
      extra_verticals:  Vec::new(),
      allow_any_origin: true,
    }
  }
}

impl ServerConfig {
  /// Layer the TOML file at `path` (optional) under `STRATA_*` variables.
  ///
  /// `STRATA_VERTICALS` takes a comma-separated list.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .separator("__")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("verticals"),
      )
      .build()?
      .try_deserialize()
  }

  /// The verticals to mount: the selected built-ins followed by the extra
  /// ones, checked as a set.
  pub fn resolve_verticals(&self) -> strata_core::Result<Vec<VerticalSpec>> {
    let mut verticals = if self.verticals.is_empty() {
      catalog::all()
    } else {
      self
        .verticals
        .iter()
        .map(|name| catalog::find(name))
        .collect::<strata_core::Result<Vec<_>>>()?
    };
    verticals.extend(self.extra_verticals.iter().cloned());
    strata_api::check_verticals(&verticals)?;
    Ok(verticals)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the service router. `verticals` should come from
/// [`ServerConfig::resolve_verticals`].
pub fn router<S>(store: Arc<S>, verticals: &[VerticalSpec], config: &ServerConfig) -> Router
where
  S: RecordStore + 'static,
{
  let app = strata_api::api_router(store, verticals).layer(TraceLayer::new_for_http());
  if config.allow_any_origin {
    app.layer(CorsLayer::permissive())
  } else {
    app
  }
}

//! HTTP server assembly for Colonia: configuration and the top-level router.
//!
//! The binary in `main.rs` picks a store backend from [`ServerConfig`] and
//! hands it to [`app`].

use std::path::{Path, PathBuf};

use axum::Router;
use colonia_core::{Registry, store::RecordStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `COLONIA__*` environment variables. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:  String,
  pub port:  u16,
  pub store: StoreConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:  "127.0.0.1".to_string(),
      port:  3000,
      store: StoreConfig::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  pub backend: StoreBackend,
  /// A directory for the JSON backend, a database file for SQLite.
  pub path:    PathBuf,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self { backend: StoreBackend::Json, path: PathBuf::from("data") }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  Json,
  Sqlite,
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `COLONIA__*` variables,
  /// e.g. `COLONIA__STORE__BACKEND=sqlite`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("COLONIA")
          .prefix_separator("__")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  /// `host:port`, ready for binding.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~/` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store.path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the record API wrapped in request tracing.
pub fn app<S>(registry: Registry<S>) -> Router
where
  S: RecordStore + 'static,
{
  colonia_api::api_router(registry).layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

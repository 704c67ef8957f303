//! HTTP server assembly for Giftshop.
//!
//! Wraps [`giftshop_api::api_router`] with request tracing and owns the
//! runtime configuration read by the `giftshop` binary.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use giftshop_core::store::CitizenStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GIFTSHOP_*` environment variables. Missing keys take their defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "0.0.0.0".to_string(),
      port:       8080,
      store_path: PathBuf::from("giftshop.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: CitizenStore + 'static,
{
  giftshop_api::api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

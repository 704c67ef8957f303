//! JSON REST API for Giftshop.
//!
//! Exposes an axum [`Router`] backed by any [`giftshop_core::store::CitizenStore`].
//! Every successful response body is `{"data": ...}`; every error body is
//! `{"error": "..."}`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = Router::new().merge(giftshop_api::api_router(store.clone()));
//! ```

pub mod error;
pub mod imports;
pub mod reports;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use giftshop_core::store::CitizenStore;
use serde::Serialize;

pub use error::ApiError;

/// The envelope around every successful response body.
#[derive(Debug, Serialize)]
pub struct Data<T> {
  pub data: T,
}

pub(crate) fn data<T: Serialize>(data: T) -> Json<Data<T>> { Json(Data { data }) }

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CitizenStore + 'static,
{
  Router::new()
    // Imports
    .route("/imports", post(imports::create::<S>))
    .route("/imports/{import_id}/citizens", get(imports::list::<S>))
    .route(
      "/imports/{import_id}/citizens/{citizen_id}",
      get(imports::get_one::<S>).patch(imports::update::<S>),
    )
    // Reports
    .route("/imports/{import_id}/citizens/birthdays", get(reports::birthdays::<S>))
    .route(
      "/imports/{import_id}/towns/stat/percentile/age",
      get(reports::age_percentiles::<S>),
    )
    .with_state(store)
}

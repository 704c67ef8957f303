//! Handlers for `/imports` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/imports` | Body: `{"citizens":[...]}`; returns 201 + `{"import_id":n}` |
//! | `GET`   | `/imports/{import_id}/citizens` | Ordered by `citizen_id`; 404 if no such import |
//! | `GET`   | `/imports/{import_id}/citizens/{citizen_id}` | 404 if not found |
//! | `PATCH` | `/imports/{import_id}/citizens/{citizen_id}` | Body: partial citizen; returns the updated citizen |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use giftshop_core::{
  citizen::{Citizen, CitizenId, ImportId},
  service,
  store::CitizenStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::{Data, data, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Created {
  pub import_id: ImportId,
}

/// `POST /imports`, body: `{"citizens":[{...}, ...]}`
///
/// The body is taken as raw JSON so that every field-level problem is
/// reported by the validators rather than by the extractor.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CitizenStore,
{
  let Json(body) = body?;
  let records = body
    .as_object()
    .ok_or_else(|| ApiError::BadRequest("expected a JSON object".into()))?
    .get("citizens")
    .ok_or_else(|| ApiError::BadRequest("missing field `citizens`".into()))?
    .as_array()
    .ok_or_else(|| ApiError::BadRequest("`citizens` must be an array".into()))?;

  let import_id = service::ingest(store.as_ref(), records).await?;
  Ok((StatusCode::CREATED, data(Created { import_id })))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /imports/{import_id}/citizens`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<ImportId>, PathRejection>,
) -> Result<Json<Data<Vec<Citizen>>>, ApiError>
where
  S: CitizenStore,
{
  let Path(import_id) = path?;
  let citizens = service::list_citizens(store.as_ref(), import_id).await?;
  Ok(data(citizens))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /imports/{import_id}/citizens/{citizen_id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(ImportId, CitizenId)>, PathRejection>,
) -> Result<Json<Data<Citizen>>, ApiError>
where
  S: CitizenStore,
{
  let Path((import_id, citizen_id)) = path?;
  let citizen = service::get_citizen(store.as_ref(), import_id, citizen_id).await?;
  Ok(data(citizen))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /imports/{import_id}/citizens/{citizen_id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<(ImportId, CitizenId)>, PathRejection>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Data<Citizen>>, ApiError>
where
  S: CitizenStore,
{
  let Path((import_id, citizen_id)) = path?;
  let Json(payload) = body?;
  let citizen = service::patch_citizen(store.as_ref(), import_id, citizen_id, &payload).await?;
  Ok(data(citizen))
}

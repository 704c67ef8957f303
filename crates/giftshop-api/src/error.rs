//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<giftshop_core::Error> for ApiError {
  fn from(e: giftshop_core::Error) -> Self {
    use giftshop_core::Error;
    match e {
      Error::Validation(v) => ApiError::BadRequest(v.to_string()),
      e @ (Error::ImportNotFound(_) | Error::CitizenNotFound { .. }) => {
        ApiError::NotFound(e.to_string())
      }
      Error::Store(source) => ApiError::Store(source),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use giftshop_core::validate::ValidationError;

  use super::*;

  #[test]
  fn core_errors_map_to_statuses() {
    let cases = [
      (giftshop_core::Error::Validation(ValidationError::EmptyPatch), StatusCode::BAD_REQUEST),
      (giftshop_core::Error::ImportNotFound(3), StatusCode::NOT_FOUND),
      (
        giftshop_core::Error::CitizenNotFound { import_id: 1, citizen_id: 2 },
        StatusCode::NOT_FOUND,
      ),
      (
        giftshop_core::Error::Store(Box::new(std::io::Error::other("disk"))),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }
}

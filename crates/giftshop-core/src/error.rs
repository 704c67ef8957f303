//! Error types for `giftshop-core`.

use thiserror::Error;

use crate::{
  citizen::{CitizenId, ImportId},
  validate::ValidationError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("import not found: {0}")]
  ImportNotFound(ImportId),

  #[error("citizen {citizen_id} not found in import {import_id}")]
  CitizenNotFound {
    import_id:  ImportId,
    citizen_id: CitizenId,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::ImportNotFound(_) | Self::CitizenNotFound { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

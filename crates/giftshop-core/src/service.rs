//! The operations exposed to request handlers.
//!
//! Each function is one unit of work against a [`CitizenStore`]: it validates
//! its input, performs at most one store transaction, and maps the outcome
//! onto [`Error`].

use chrono::NaiveDate;
use serde_json::Value;

use crate::{
  Error, Result,
  birthdays::{self, BirthdayReport},
  citizen::{Citizen, CitizenId, ImportId},
  percentile::{self, TownAgeStats},
  relatives,
  store::CitizenStore,
  validate,
};

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

/// Validate a batch of raw citizen records and persist it as a new import.
///
/// Nothing is written unless every record passes validation.
pub async fn ingest<S: CitizenStore>(store: &S, records: &[Value]) -> Result<ImportId> {
  let citizens = validate::validate_import(records).inspect_err(|e| {
    tracing::debug!(error = %e, records = records.len(), "import rejected");
  })?;

  let lists = citizens.iter().map(|c| (c.citizen_id, c.relatives.as_slice()));
  if let Some((citizen_id, relative_id)) = relatives::find_asymmetry(lists) {
    tracing::warn!(citizen_id, relative_id, "import relatives are one-sided; stored as given");
  }

  let count = citizens.len();
  let import_id = store.create_import(citizens).await.map_err(store_err)?;
  tracing::info!(import_id, citizens = count, "import created");
  Ok(import_id)
}

/// Apply a partial update to one citizen.
///
/// The payload is validated field by field with the same rules as ingestion.
/// A `relatives` change also rewrites every affected neighbour.
pub async fn patch_citizen<S: CitizenStore>(
  store: &S,
  import_id: ImportId,
  citizen_id: CitizenId,
  payload: &Value,
) -> Result<Citizen> {
  let patch = validate::validate_patch(payload).inspect_err(|e| {
    tracing::debug!(error = %e, import_id, citizen_id, "patch rejected");
  })?;

  let touches_relatives = patch.relatives.is_some();
  let citizen = store
    .update_citizen(import_id, citizen_id, patch)
    .await
    .map_err(store_err)?
    .ok_or(Error::CitizenNotFound { import_id, citizen_id })?;

  tracing::info!(import_id, citizen_id, touches_relatives, "citizen updated");
  Ok(citizen)
}

pub async fn get_citizen<S: CitizenStore>(
  store: &S,
  import_id: ImportId,
  citizen_id: CitizenId,
) -> Result<Citizen> {
  store
    .get_citizen(import_id, citizen_id)
    .await
    .map_err(store_err)?
    .ok_or(Error::CitizenNotFound { import_id, citizen_id })
}

/// All citizens of an import, ordered by `citizen_id`.
///
/// An import created from an empty batch yields an empty list; an unknown
/// import is an error.
pub async fn list_citizens<S: CitizenStore>(store: &S, import_id: ImportId) -> Result<Vec<Citizen>> {
  let citizens = store.list_citizens(import_id).await.map_err(store_err)?;
  if citizens.is_empty() && !store.import_exists(import_id).await.map_err(store_err)? {
    return Err(Error::ImportNotFound(import_id));
  }
  Ok(citizens)
}

pub async fn birthday_report<S: CitizenStore>(store: &S, import_id: ImportId) -> Result<BirthdayReport> {
  let citizens = list_citizens(store, import_id).await?;
  Ok(birthdays::birthday_report(&citizens))
}

/// Per-town age percentiles as of `today`.
pub async fn age_percentile_report<S: CitizenStore>(
  store: &S,
  import_id: ImportId,
  today: NaiveDate,
) -> Result<Vec<TownAgeStats>> {
  let citizens = list_citizens(store, import_id).await?;
  Ok(percentile::age_percentiles(&citizens, today))
}

//! Handlers for the per-import reports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/imports/{import_id}/citizens/birthdays` | Month keys `"1"`..`"12"` |
//! | `GET`  | `/imports/{import_id}/towns/stat/percentile/age` | Optional `?as_of=DD.MM.YYYY`, defaults to today (UTC) |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{PathRejection, QueryRejection},
  },
};
use chrono::Utc;
use giftshop_core::{
  birthdays::BirthdayReport,
  citizen::ImportId,
  date,
  percentile::TownAgeStats,
  service,
  store::CitizenStore,
};
use serde::Deserialize;

use crate::{Data, data, error::ApiError};

// ─── Birthdays ────────────────────────────────────────────────────────────────

/// `GET /imports/{import_id}/citizens/birthdays`
pub async fn birthdays<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<ImportId>, PathRejection>,
) -> Result<Json<Data<BirthdayReport>>, ApiError>
where
  S: CitizenStore,
{
  let Path(import_id) = path?;
  let report = service::birthday_report(store.as_ref(), import_id).await?;
  Ok(data(report))
}

// ─── Age percentiles ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PercentileParams {
  /// Reference date for ages, `DD.MM.YYYY`.
  pub as_of: Option<String>,
}

/// `GET /imports/{import_id}/towns/stat/percentile/age[?as_of=DD.MM.YYYY]`
pub async fn age_percentiles<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<ImportId>, PathRejection>,
  query: Result<Query<PercentileParams>, QueryRejection>,
) -> Result<Json<Data<Vec<TownAgeStats>>>, ApiError>
where
  S: CitizenStore,
{
  let Path(import_id) = path?;
  let Query(params) = query?;
  let today = match params.as_of.as_deref() {
    Some(s) => date::parse(s)
      .ok_or_else(|| ApiError::BadRequest(format!("invalid `as_of` date {s:?}")))?,
    None => Utc::now().date_naive(),
  };

  let stats = service::age_percentile_report(store.as_ref(), import_id, today).await?;
  Ok(data(stats))
}

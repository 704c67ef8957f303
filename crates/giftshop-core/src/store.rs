//! The `CitizenStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `giftshop-store-sqlite`).
//! Higher layers (`giftshop-api`, [`crate::service`]) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::citizen::{Citizen, CitizenId, CitizenPatch, ImportId};

/// Abstraction over a Giftshop storage backend.
///
/// Every write is a single transaction: either all of its effects become
/// visible or none do. Implementations must serialise writes that touch the
/// same import so the relative graph cannot lose an update.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CitizenStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Imports ───────────────────────────────────────────────────────────

  /// Persist a new import together with all of its citizens and return the
  /// assigned id. Citizens must already be validated; relatives are stored
  /// exactly as given.
  fn create_import(
    &self,
    citizens: Vec<Citizen>,
  ) -> impl Future<Output = Result<ImportId, Self::Error>> + Send + '_;

  fn import_exists(
    &self,
    import_id: ImportId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Citizens ──────────────────────────────────────────────────────────

  /// Retrieve one citizen. Returns `None` if the import or the citizen does
  /// not exist.
  fn get_citizen(
    &self,
    import_id: ImportId,
    citizen_id: CitizenId,
  ) -> impl Future<Output = Result<Option<Citizen>, Self::Error>> + Send + '_;

  /// All citizens of an import, ordered by `citizen_id`. Empty if the import
  /// does not exist.
  fn list_citizens(
    &self,
    import_id: ImportId,
  ) -> impl Future<Output = Result<Vec<Citizen>, Self::Error>> + Send + '_;

  /// Apply a validated patch in one transaction.
  ///
  /// Scalar fields are overwritten; a `relatives` change is routed through
  /// [`crate::relatives::set_relatives`] so every neighbour is updated in the
  /// same transaction. Returns the updated citizen, or `None` if it does not
  /// exist (in which case nothing is written).
  fn update_citizen(
    &self,
    import_id: ImportId,
    citizen_id: CitizenId,
    patch: CitizenPatch,
  ) -> impl Future<Output = Result<Option<Citizen>, Self::Error>> + Send + '_;
}

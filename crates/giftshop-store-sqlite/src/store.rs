//! [`SqliteStore`]: the SQLite implementation of [`CitizenStore`].

use std::path::Path;

use giftshop_core::{
  citizen::{Citizen, CitizenId, CitizenPatch, ImportId},
  relatives,
  store::CitizenStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{CITIZEN_COLUMNS, RawCitizen, encode_date, encode_gender},
  graph::TxGraph,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Giftshop citizen store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn select_citizen(
  conn: &rusqlite::Connection,
  import_id: ImportId,
  citizen_id: CitizenId,
) -> rusqlite::Result<Option<RawCitizen>> {
  conn
    .query_row(
      &format!("SELECT {CITIZEN_COLUMNS} FROM citizens WHERE import_id = ?1 AND citizen_id = ?2"),
      rusqlite::params![import_id, citizen_id],
      RawCitizen::from_row,
    )
    .optional()
}

/// Lift a decode failure into the error type `Connection::call` expects.
fn decode_in_call<T>(r: Result<T>) -> tokio_rusqlite::Result<T> {
  r.map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

// ─── CitizenStore impl ───────────────────────────────────────────────────────

impl CitizenStore for SqliteStore {
  type Error = Error;

  // ── Imports ───────────────────────────────────────────────────────────────

  async fn create_import(&self, citizens: Vec<Citizen>) -> Result<ImportId> {
    let rows: Vec<RawCitizen> = citizens.into_iter().map(RawCitizen::from).collect();

    let import_id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("INSERT INTO imports DEFAULT VALUES", [])?;
        let import_id = tx.last_insert_rowid();
        {
          let mut stmt = tx.prepare(
            "INSERT INTO citizens (
               import_id, citizen_id, town, street, building,
               apartment, name, birth_date, gender, relatives
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              import_id,
              row.citizen_id,
              row.town,
              row.street,
              row.building,
              row.apartment,
              row.name,
              row.birth_date,
              row.gender,
              row.relatives,
            ])?;
          }
        }
        tx.commit()?;
        Ok(import_id)
      })
      .await?;

    Ok(import_id)
  }

  async fn import_exists(&self, import_id: ImportId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM imports WHERE import_id = ?1",
              rusqlite::params![import_id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  // ── Citizens ──────────────────────────────────────────────────────────────

  async fn get_citizen(&self, import_id: ImportId, citizen_id: CitizenId) -> Result<Option<Citizen>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_citizen(conn, import_id, citizen_id)?))
      .await?;

    raw.map(RawCitizen::into_citizen).transpose()
  }

  async fn list_citizens(&self, import_id: ImportId) -> Result<Vec<Citizen>> {
    let raws: Vec<RawCitizen> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CITIZEN_COLUMNS} FROM citizens WHERE import_id = ?1 ORDER BY citizen_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![import_id], RawCitizen::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCitizen::into_citizen).collect()
  }

  async fn update_citizen(
    &self,
    import_id:  ImportId,
    citizen_id: CitizenId,
    patch:      CitizenPatch,
  ) -> Result<Option<Citizen>> {
    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = select_citizen(&tx, import_id, citizen_id)? else {
          return Ok(None);
        };
        let mut citizen = decode_in_call(raw.into_citizen())?;
        patch.apply_scalars(&mut citizen);

        tx.execute(
          "UPDATE citizens
           SET town = ?1, street = ?2, building = ?3, apartment = ?4,
               name = ?5, birth_date = ?6, gender = ?7
           WHERE import_id = ?8 AND citizen_id = ?9",
          rusqlite::params![
            citizen.town,
            citizen.street,
            citizen.building,
            citizen.apartment,
            citizen.name,
            encode_date(citizen.birth_date),
            encode_gender(citizen.gender),
            import_id,
            citizen_id,
          ],
        )?;

        if let Some(new_relatives) = patch.relatives {
          let mut graph = TxGraph::new(&tx, import_id);
          if let Some(repair) = relatives::set_relatives(&mut graph, citizen_id, new_relatives)? {
            citizen.relatives = repair.relatives;
          }
        }

        tx.commit()?;
        Ok(Some(citizen))
      })
      .await?;

    if let Some(c) = &updated {
      tracing::debug!(import_id, citizen_id = c.citizen_id, "citizen row committed");
    }
    Ok(updated)
  }
}

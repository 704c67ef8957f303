//! [`RelativeGraph`] over an open SQLite transaction.

use giftshop_core::{
  citizen::{CitizenId, ImportId},
  relatives::RelativeGraph,
};
use rusqlite::{OptionalExtension as _, Transaction};

use crate::encode::Relatives;

/// The relative lists of one import, read and written through `tx`.
///
/// Nothing is visible to other connections until the caller commits `tx`.
pub struct TxGraph<'a> {
  tx:        &'a Transaction<'a>,
  import_id: ImportId,
}

impl<'a> TxGraph<'a> {
  pub fn new(tx: &'a Transaction<'a>, import_id: ImportId) -> Self { Self { tx, import_id } }
}

impl RelativeGraph for TxGraph<'_> {
  type Error = rusqlite::Error;

  fn relatives_of(&mut self, citizen_id: CitizenId) -> rusqlite::Result<Option<Vec<CitizenId>>> {
    let relatives: Option<Relatives> = self
      .tx
      .query_row(
        "SELECT relatives FROM citizens WHERE import_id = ?1 AND citizen_id = ?2",
        rusqlite::params![self.import_id, citizen_id],
        |row| row.get(0),
      )
      .optional()?;
    Ok(relatives.map(|r| r.0))
  }

  fn replace_relatives(
    &mut self,
    citizen_id: CitizenId,
    relatives: &[CitizenId],
  ) -> rusqlite::Result<()> {
    self.tx.execute(
      "UPDATE citizens SET relatives = ?1 WHERE import_id = ?2 AND citizen_id = ?3",
      rusqlite::params![Relatives(relatives.to_vec()), self.import_id, citizen_id],
    )?;
    Ok(())
  }
}

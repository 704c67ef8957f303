//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Birth dates are stored as ISO 8601 calendar dates, genders as their
//! lowercase name, and relative lists as compact JSON arrays.

use chrono::NaiveDate;
use giftshop_core::citizen::{Citizen, CitizenId, Gender};
use rusqlite::{
  Row, ToSql,
  types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.as_str() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  Gender::from_name(s).ok_or_else(|| Error::UnknownGender(s.to_owned()))
}

// ─── Relatives ───────────────────────────────────────────────────────────────

/// The `relatives` column: a JSON array of citizen ids.
///
/// Implements [`FromSql`]/[`ToSql`] directly so the relative graph can be read
/// and written inside a transaction without leaving rusqlite's error type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relatives(pub Vec<CitizenId>);

impl FromSql for Relatives {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    let s = value.as_str()?;
    serde_json::from_str(s)
      .map(Relatives)
      .map_err(|e| FromSqlError::Other(Box::new(e)))
  }
}

impl ToSql for Relatives {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    let s = serde_json::to_string(&self.0)
      .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    Ok(ToSqlOutput::from(s))
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCitizen::from_row`].
pub const CITIZEN_COLUMNS: &str =
  "citizen_id, town, street, building, apartment, name, birth_date, gender, relatives";

/// A `citizens` row with its columns in storage form.
#[derive(Debug, Clone)]
pub struct RawCitizen {
  pub citizen_id: CitizenId,
  pub town:       String,
  pub street:     String,
  pub building:   String,
  pub apartment:  i64,
  pub name:       String,
  pub birth_date: String,
  pub gender:     String,
  pub relatives:  Relatives,
}

impl RawCitizen {
  /// Read a row selected with [`CITIZEN_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawCitizen {
      citizen_id: row.get(0)?,
      town:       row.get(1)?,
      street:     row.get(2)?,
      building:   row.get(3)?,
      apartment:  row.get(4)?,
      name:       row.get(5)?,
      birth_date: row.get(6)?,
      gender:     row.get(7)?,
      relatives:  row.get(8)?,
    })
  }

  pub fn into_citizen(self) -> Result<Citizen> {
    Ok(Citizen {
      citizen_id: self.citizen_id,
      town:       self.town,
      street:     self.street,
      building:   self.building,
      apartment:  self.apartment,
      name:       self.name,
      birth_date: decode_date(&self.birth_date)?,
      gender:     decode_gender(&self.gender)?,
      relatives:  self.relatives.0,
    })
  }
}

impl From<Citizen> for RawCitizen {
  fn from(c: Citizen) -> Self {
    RawCitizen {
      citizen_id: c.citizen_id,
      town:       c.town,
      street:     c.street,
      building:   c.building,
      apartment:  c.apartment,
      name:       c.name,
      birth_date: encode_date(c.birth_date),
      gender:     encode_gender(c.gender).to_owned(),
      relatives:  Relatives(c.relatives),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_are_iso() {
    let d = NaiveDate::from_ymd_opt(1986, 12, 26).unwrap();
    assert_eq!(encode_date(d), "1986-12-26");
    assert_eq!(decode_date("1986-12-26").unwrap(), d);
    assert!(matches!(decode_date("26.12.1986"), Err(Error::DateParse(_))));
  }

  #[test]
  fn genders_round_trip_by_name() {
    assert_eq!(decode_gender(encode_gender(Gender::Female)).unwrap(), Gender::Female);
    assert!(matches!(decode_gender("other"), Err(Error::UnknownGender(_))));
  }
}

//! The `DD.MM.YYYY` calendar date format used on the wire.
//!
//! Use as `#[serde(with = "giftshop_core::date")]` on a [`NaiveDate`] field.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer, de};

/// `chrono` format string matching `DD.MM.YYYY`.
pub const FORMAT: &str = "%d.%m.%Y";

/// Parse a strict `DD.MM.YYYY` string into a real calendar date.
///
/// Returns `None` for any other shape (`1.2.2019`, `2019-02-01`, …) and for
/// dates that do not exist (`31.02.2019`).
pub fn parse(s: &str) -> Option<NaiveDate> {
  let bytes = s.as_bytes();
  let shape_ok = bytes.len() == 10
    && bytes[2] == b'.'
    && bytes[5] == b'.'
    && bytes
      .iter()
      .enumerate()
      .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
  if !shape_ok {
    return None;
  }
  NaiveDate::parse_from_str(s, FORMAT).ok()
}

/// Format a date as `DD.MM.YYYY`.
pub fn format(date: NaiveDate) -> String {
  format!("{:02}.{:02}.{:04}", date.day(), date.month(), date.year())
}

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_str(&format(*date))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
  let s = String::deserialize(deserializer)?;
  parse(&s).ok_or_else(|| de::Error::custom(format!("invalid date {s:?}, expected DD.MM.YYYY")))
}

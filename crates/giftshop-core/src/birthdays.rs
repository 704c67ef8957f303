//! Birthday report: how many presents each citizen buys per month.
//!
//! A citizen buys one present for every relative whose birthday falls in a
//! month, so the count for `(citizen, month)` is the number of that
//! citizen's relatives born in that month.

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::citizen::{Citizen, CitizenId};

/// One line of a month's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presents {
  pub citizen_id: CitizenId,
  pub presents:   u32,
}

/// Twelve per-month lists, January first.
///
/// Serialises as a JSON object keyed `"1"` through `"12"`; every key is
/// always present, with an empty list for months nobody shops in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirthdayReport {
  months: [Vec<Presents>; 12],
}

impl BirthdayReport {
  /// Entries for `month` (1–12), or `None` for any other value.
  pub fn month(&self, month: u32) -> Option<&[Presents]> {
    let slot = usize::try_from(month).ok()?.checked_sub(1)?;
    self.months.get(slot).map(Vec::as_slice)
  }

  /// `(month, entries)` pairs in calendar order.
  pub fn iter(&self) -> impl Iterator<Item = (u32, &[Presents])> + '_ {
    self
      .months
      .iter()
      .enumerate()
      .map(|(i, entries)| (i as u32 + 1, entries.as_slice()))
  }
}

impl Serialize for BirthdayReport {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(12))?;
    for (month, entries) in self.iter() {
      map.serialize_entry(&month.to_string(), entries)?;
    }
    map.end()
  }
}

/// Build the report for one import.
///
/// Citizens are visited in the order given, so each month's list follows
/// that order. Relative ids that do not resolve to a citizen in `citizens`
/// are ignored.
pub fn birthday_report(citizens: &[Citizen]) -> BirthdayReport {
  let birth_month: HashMap<CitizenId, u32> = citizens
    .iter()
    .map(|c| (c.citizen_id, c.birth_date.month()))
    .collect();

  let mut report = BirthdayReport::default();
  for citizen in citizens {
    let mut counts = [0u32; 12];
    for month in citizen
      .relatives
      .iter()
      .filter_map(|id| birth_month.get(id))
    {
      counts[*month as usize - 1] += 1;
    }

    for (slot, presents) in counts.into_iter().enumerate() {
      if presents > 0 {
        report.months[slot].push(Presents {
          citizen_id: citizen.citizen_id,
          presents,
        });
      }
    }
  }
  report
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::citizen::Gender;

  fn citizen(id: CitizenId, birth_date: &str, relatives: &[CitizenId]) -> Citizen {
    Citizen {
      citizen_id: id,
      town:       "Москва".into(),
      street:     "Льва Толстого".into(),
      building:   "16к7стр5".into(),
      apartment:  7,
      name:       format!("Citizen {id}"),
      birth_date: crate::date::parse(birth_date).unwrap(),
      gender:     Gender::Male,
      relatives:  relatives.to_vec(),
    }
  }

  fn fixture() -> Vec<Citizen> {
    vec![
      citizen(1, "26.12.1986", &[2, 3]),
      citizen(2, "01.04.1997", &[1]),
      citizen(3, "23.11.1986", &[1]),
    ]
  }

  #[test]
  fn documented_fixture() {
    let report = birthday_report(&fixture());
    assert_eq!(
      serde_json::to_value(&report).unwrap(),
      json!({
        "1": [], "2": [], "3": [],
        "4": [{"citizen_id": 1, "presents": 1}],
        "5": [], "6": [], "7": [], "8": [], "9": [], "10": [],
        "11": [{"citizen_id": 1, "presents": 1}],
        "12": [
          {"citizen_id": 2, "presents": 1},
          {"citizen_id": 3, "presents": 1}
        ]
      })
    );
  }

  #[test]
  fn counts_relatives_not_months() {
    let citizens = vec![
      citizen(1, "01.01.1990", &[2, 3, 4]),
      citizen(2, "05.03.1960", &[1]),
      citizen(3, "17.03.1962", &[1]),
      citizen(4, "09.07.2015", &[1]),
    ];
    let report = birthday_report(&citizens);
    assert_eq!(report.month(3), Some(&[Presents { citizen_id: 1, presents: 2 }][..]));
    assert_eq!(report.month(7), Some(&[Presents { citizen_id: 1, presents: 1 }][..]));
    assert_eq!(report.month(1).map(<[_]>::len), Some(3));
  }

  #[test]
  fn month_outside_calendar_is_none() {
    let report = birthday_report(&fixture());
    assert_eq!(report.month(0), None);
    assert_eq!(report.month(13), None);
    assert_eq!(report.month(12).map(<[_]>::len), Some(2));
  }

  #[test]
  fn every_month_is_present_even_when_empty() {
    let report = birthday_report(&[citizen(1, "01.01.1990", &[])]);
    let json = serde_json::to_value(&report).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 12);
    for m in 1..=12 {
      assert!(keys.contains(&m.to_string()));
    }
    assert!(report.iter().all(|(_, entries)| entries.is_empty()));
  }

  #[test]
  fn monthly_totals_equal_relative_pairs() {
    let citizens = fixture();
    let report = birthday_report(&citizens);
    let by_id: HashMap<_, _> = citizens.iter().map(|c| (c.citizen_id, c)).collect();
    for (month, entries) in report.iter() {
      let total: u32 = entries.iter().map(|p| p.presents).sum();
      let pairs = citizens
        .iter()
        .flat_map(|c| c.relatives.iter())
        .filter(|&&id| by_id[&id].birth_date.month() == month)
        .count() as u32;
      assert_eq!(total, pairs, "month {month}");
    }
  }

  #[test]
  fn dangling_relatives_are_ignored() {
    let report = birthday_report(&[citizen(1, "01.01.1990", &[42])]);
    assert!(report.iter().all(|(_, entries)| entries.is_empty()));
  }
}

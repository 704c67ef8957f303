//! Per-town age percentiles.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::citizen::Citizen;

/// Age statistics for one town, rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TownAgeStats {
  pub town: String,
  pub p50:  f64,
  pub p75:  f64,
  pub p99:  f64,
}

/// The `p`-th percentile of an ascending slice, interpolating linearly
/// between the two closest ranks.
///
/// The rank is `p / 100 * (n - 1)`; with a fractional rank the result lies on
/// the straight line between the values at its floor and ceiling. Returns
/// `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
  let last = sorted.len().checked_sub(1)?;
  let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
  let lo = rank.floor() as usize;
  let hi = rank.ceil() as usize;
  let frac = rank - lo as f64;
  Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn round2(v: f64) -> f64 { (v * 100.0).round() / 100.0 }

/// Group `citizens` by town and compute p50/p75/p99 of their ages on
/// `today`.
///
/// Towns appear in the order they are first met in `citizens`.
pub fn age_percentiles(citizens: &[Citizen], today: NaiveDate) -> Vec<TownAgeStats> {
  let mut towns: Vec<(&str, Vec<f64>)> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();
  for citizen in citizens {
    let age = f64::from(citizen.age_on(today));
    let slot = *index.entry(citizen.town.as_str()).or_insert_with(|| {
      towns.push((citizen.town.as_str(), Vec::new()));
      towns.len() - 1
    });
    towns[slot].1.push(age);
  }

  towns
    .into_iter()
    .filter_map(|(town, mut ages)| {
      ages.sort_by(f64::total_cmp);
      Some(TownAgeStats {
        town: town.to_owned(),
        p50:  round2(percentile(&ages, 50.0)?),
        p75:  round2(percentile(&ages, 75.0)?),
        p99:  round2(percentile(&ages, 99.0)?),
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::citizen::Gender;

  fn citizen(id: i64, town: &str, birth_date: &str) -> Citizen {
    Citizen {
      citizen_id: id,
      town:       town.into(),
      street:     "S".into(),
      building:   "B".into(),
      apartment:  1,
      name:       "N".into(),
      birth_date: crate::date::parse(birth_date).unwrap(),
      gender:     Gender::Female,
      relatives:  vec![],
    }
  }

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  #[test]
  fn linear_interpolation() {
    let xs = [22.0, 32.0];
    assert_eq!(percentile(&xs, 50.0), Some(27.0));
    assert_eq!(percentile(&xs, 75.0), Some(29.5));
    assert!((percentile(&xs, 99.0).unwrap() - 31.9).abs() < 1e-9);
    assert_eq!(percentile(&xs, 0.0), Some(22.0));
    assert_eq!(percentile(&xs, 100.0), Some(32.0));
    assert_eq!(percentile(&[], 50.0), None);
  }

  #[test]
  fn interpolates_between_inner_ranks() {
    let xs = [1.0, 2.0, 3.0, 4.0, 10.0];
    // rank 0.75 * 4 = 3 → exactly the fourth value
    assert_eq!(percentile(&xs, 75.0), Some(4.0));
    // rank 0.99 * 4 = 3.96 → 4 + 6 * 0.96
    assert!((percentile(&xs, 99.0).unwrap() - 9.76).abs() < 1e-9);
  }

  #[test]
  fn documented_fixture() {
    let citizens = [
      citizen(1, "Москва", "26.12.1986"),
      citizen(2, "Москва", "01.04.1997"),
      citizen(3, "Санкт-Петербург", "23.11.1986"),
    ];
    let stats = age_percentiles(&citizens, ymd(2019, 8, 1));
    assert_eq!(
      stats,
      vec![
        TownAgeStats { town: "Москва".into(), p50: 27.0, p75: 29.5, p99: 31.9 },
        TownAgeStats { town: "Санкт-Петербург".into(), p50: 32.0, p75: 32.0, p99: 32.0 },
      ]
    );
  }

  #[test]
  fn single_citizen_town_repeats_its_age() {
    let stats = age_percentiles(&[citizen(1, "Тверь", "10.10.2000")], ymd(2020, 10, 9));
    assert_eq!(stats.len(), 1);
    assert_eq!((stats[0].p50, stats[0].p75, stats[0].p99), (19.0, 19.0, 19.0));
  }

  #[test]
  fn towns_keep_first_seen_order_and_unsorted_input_is_fine() {
    let citizens = [
      citizen(1, "B", "01.01.1950"),
      citizen(2, "A", "01.01.2000"),
      citizen(3, "B", "01.01.2010"),
      citizen(4, "B", "01.01.1990"),
    ];
    let stats = age_percentiles(&citizens, ymd(2020, 6, 1));
    let towns: Vec<_> = stats.iter().map(|s| s.town.as_str()).collect();
    assert_eq!(towns, ["B", "A"]);
    // B ages sorted: 10, 30, 70
    assert_eq!(stats[0].p50, 30.0);
    assert_eq!(stats[0].p75, 50.0);
    assert_eq!(stats[0].p99, 69.2);
  }

  #[test]
  fn many_interleaved_towns_group_correctly() {
    let names: Vec<String> = (0..50).map(|i| format!("T{i}")).collect();
    let citizens: Vec<Citizen> = (0..200)
      .map(|i| {
        let year = 2000 - (i / 50) as i32 * 10;
        citizen(i as i64, &names[i % 50], &format!("01.01.{year}"))
      })
      .collect();

    let stats = age_percentiles(&citizens, ymd(2020, 6, 1));
    let towns: Vec<_> = stats.iter().map(|s| s.town.as_str()).collect();
    assert_eq!(towns, names.iter().map(String::as_str).collect::<Vec<_>>());
    // Every town holds ages 20, 30, 40, 50.
    for s in &stats {
      assert_eq!((s.p50, s.p75), (35.0, 42.5), "{}", s.town);
    }
  }

  #[test]
  fn rounds_to_two_decimals() {
    assert_eq!(round2(31.900000000000002), 31.9);
    assert_eq!(round2(1.23456), 1.23);
  }
}

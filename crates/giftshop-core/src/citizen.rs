//! Citizen: one person record inside an import.
//!
//! An import is nothing but an identifier; all data lives on its citizens.
//! Citizens reference each other by `citizen_id`, which is only unique within
//! the owning import.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// System-assigned identifier of one ingested batch.
pub type ImportId = i64;

/// Caller-supplied identifier of a citizen, unique within its import.
pub type CitizenId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(self) -> &'static str {
    match self {
      Gender::Male => "male",
      Gender::Female => "female",
    }
  }

  pub fn from_name(s: &str) -> Option<Self> {
    match s {
      "male" => Some(Gender::Male),
      "female" => Some(Gender::Female),
      _ => None,
    }
  }
}

/// A citizen as stored and as returned to callers.
///
/// Field order matches the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
  pub citizen_id: CitizenId,
  pub town:       String,
  pub street:     String,
  pub building:   String,
  pub apartment:  i64,
  pub name:       String,
  #[serde(with = "crate::date")]
  pub birth_date: NaiveDate,
  pub gender:     Gender,
  /// Ids of relatives within the same import. Symmetric across the import.
  pub relatives:  Vec<CitizenId>,
}

impl Citizen {
  /// Age in completed years on `today`.
  ///
  /// A birthday counts only once its month and day have been reached, so a
  /// 29 February birthday is completed on 1 March in non-leap years.
  pub fn age_on(&self, today: NaiveDate) -> i32 {
    let mut age = today.year() - self.birth_date.year();
    if (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day()) {
      age -= 1;
    }
    age
  }
}

/// A validated partial update. `None` leaves the field untouched.
///
/// `citizen_id` is deliberately absent: it can never be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitizenPatch {
  pub town:       Option<String>,
  pub street:     Option<String>,
  pub building:   Option<String>,
  pub apartment:  Option<i64>,
  pub name:       Option<String>,
  pub birth_date: Option<NaiveDate>,
  pub gender:     Option<Gender>,
  pub relatives:  Option<Vec<CitizenId>>,
}

impl CitizenPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Copy every scalar field that is set onto `citizen`.
  ///
  /// `relatives` is not applied here; a relatives change must go through
  /// [`crate::relatives::set_relatives`] so the rest of the import is kept
  /// symmetric.
  pub fn apply_scalars(&self, citizen: &mut Citizen) {
    if let Some(town) = &self.town {
      citizen.town = town.clone();
    }
    if let Some(street) = &self.street {
      citizen.street = street.clone();
    }
    if let Some(building) = &self.building {
      citizen.building = building.clone();
    }
    if let Some(apartment) = self.apartment {
      citizen.apartment = apartment;
    }
    if let Some(name) = &self.name {
      citizen.name = name.clone();
    }
    if let Some(birth_date) = self.birth_date {
      citizen.birth_date = birth_date;
    }
    if let Some(gender) = self.gender {
      citizen.gender = gender;
    }
  }
}

//! Validation of raw JSON citizen records.
//!
//! Every mutable field has one validator in [`FIELDS`]; ingestion and patching
//! both go through that registry so a field is accepted or rejected the same
//! way regardless of the request that carries it. `citizen_id` has its own
//! validator because it is an identity and can never be patched.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
  citizen::{Citizen, CitizenId, CitizenPatch, Gender},
  date,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("expected a JSON object, got {0}")]
  NotAnObject(&'static str),

  #[error("missing field `{0}`")]
  MissingField(&'static str),

  #[error("unknown field `{0}`")]
  UnknownField(String),

  #[error("invalid `{field}`: {reason}")]
  InvalidField {
    field:  &'static str,
    reason: String,
  },

  #[error("duplicate citizen_id {0}")]
  DuplicateCitizenId(CitizenId),

  #[error("relative {0} is not a citizen of this import")]
  UnknownRelative(CitizenId),

  #[error("no fields to update")]
  EmptyPatch,

  #[error("citizen_id cannot be changed")]
  CitizenIdImmutable,
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

// ─── Field registry ──────────────────────────────────────────────────────────

/// A successfully validated value for one registry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Town(String),
  Street(String),
  Building(String),
  Apartment(i64),
  Name(String),
  BirthDate(NaiveDate),
  Gender(Gender),
  Relatives(Vec<CitizenId>),
}

impl FieldValue {
  fn apply(self, patch: &mut CitizenPatch) {
    match self {
      FieldValue::Town(v) => patch.town = Some(v),
      FieldValue::Street(v) => patch.street = Some(v),
      FieldValue::Building(v) => patch.building = Some(v),
      FieldValue::Apartment(v) => patch.apartment = Some(v),
      FieldValue::Name(v) => patch.name = Some(v),
      FieldValue::BirthDate(v) => patch.birth_date = Some(v),
      FieldValue::Gender(v) => patch.gender = Some(v),
      FieldValue::Relatives(v) => patch.relatives = Some(v),
    }
  }
}

/// A field validator: the parsed value, or the reason it was rejected.
pub type Validator = fn(&Value) -> Result<FieldValue, String>;

/// Name of the identity field, validated by [`citizen_id`].
pub const CITIZEN_ID: &str = "citizen_id";

/// Every mutable citizen field with its validator, in wire order.
pub const FIELDS: &[(&str, Validator)] = &[
  ("town", town),
  ("street", street),
  ("building", building),
  ("apartment", apartment),
  ("name", name),
  ("birth_date", birth_date),
  ("gender", gender),
  ("relatives", relatives),
];

/// Look up the registry entry for `field`.
pub fn lookup(field: &str) -> Option<(&'static str, Validator)> {
  FIELDS.iter().copied().find(|(name, _)| *name == field)
}

fn town(v: &Value) -> Result<FieldValue, String> { address_part(v).map(FieldValue::Town) }

fn street(v: &Value) -> Result<FieldValue, String> { address_part(v).map(FieldValue::Street) }

fn building(v: &Value) -> Result<FieldValue, String> { address_part(v).map(FieldValue::Building) }

fn apartment(v: &Value) -> Result<FieldValue, String> {
  non_negative_int(v).map(FieldValue::Apartment)
}

fn name(v: &Value) -> Result<FieldValue, String> {
  match v {
    Value::String(s) if !s.is_empty() => Ok(FieldValue::Name(s.clone())),
    Value::String(_) => Err("must not be empty".into()),
    other => Err(format!("expected a string, got {}", kind(other))),
  }
}

fn birth_date(v: &Value) -> Result<FieldValue, String> {
  let s = v
    .as_str()
    .ok_or_else(|| format!("expected a string, got {}", kind(v)))?;
  date::parse(s)
    .map(FieldValue::BirthDate)
    .ok_or_else(|| format!("{s:?} is not a DD.MM.YYYY calendar date"))
}

fn gender(v: &Value) -> Result<FieldValue, String> {
  v.as_str()
    .and_then(Gender::from_name)
    .map(FieldValue::Gender)
    .ok_or_else(|| format!("expected \"male\" or \"female\", got {v}"))
}

fn relatives(v: &Value) -> Result<FieldValue, String> {
  let items = v
    .as_array()
    .ok_or_else(|| format!("expected a list, got {}", kind(v)))?;
  let mut seen = HashSet::with_capacity(items.len());
  let mut ids = Vec::with_capacity(items.len());
  for item in items {
    let id = item
      .as_i64()
      .ok_or_else(|| format!("expected a list of integers, got {item}"))?;
    if seen.insert(id) {
      ids.push(id);
    }
  }
  Ok(FieldValue::Relatives(ids))
}

/// Town, street and building: a non-empty string with at least one letter or
/// digit.
fn address_part(v: &Value) -> Result<String, String> {
  match v {
    Value::String(s) if s.chars().any(char::is_alphanumeric) => Ok(s.clone()),
    Value::String(_) => Err("must contain at least one letter or digit".into()),
    other => Err(format!("expected a string, got {}", kind(other))),
  }
}

fn non_negative_int(v: &Value) -> Result<i64, String> {
  match v.as_i64() {
    Some(n) if n >= 0 => Ok(n),
    Some(n) => Err(format!("{n} is negative")),
    None => Err(format!("expected a non-negative integer, got {v}")),
  }
}

fn kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "an object",
  }
}

/// Validate the identity field of a record.
pub fn citizen_id(v: &Value) -> Result<CitizenId> {
  non_negative_int(v).map_err(|reason| ValidationError::InvalidField {
    field: CITIZEN_ID,
    reason,
  })
}

fn check(field: &'static str, validator: Validator, v: &Value) -> Result<FieldValue> {
  validator(v).map_err(|reason| ValidationError::InvalidField { field, reason })
}

fn as_object(v: &Value) -> Result<&Map<String, Value>> {
  v.as_object().ok_or(ValidationError::NotAnObject(kind(v)))
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Validate one complete citizen record.
///
/// Checks, failing on the first violation: `citizen_id`, then every registry
/// field is present and valid, then no unknown fields remain.
pub fn validate_record(raw: &Value) -> Result<Citizen> {
  let obj = as_object(raw)?;
  let id = record_id(obj)?;

  let mut patch = CitizenPatch::default();
  for &(field, validator) in FIELDS {
    let v = obj.get(field).ok_or(ValidationError::MissingField(field))?;
    check(field, validator, v)?.apply(&mut patch);
  }

  if let Some(unknown) = obj
    .keys()
    .find(|k| k.as_str() != CITIZEN_ID && lookup(k).is_none())
  {
    return Err(ValidationError::UnknownField(unknown.clone()));
  }

  into_citizen(id, patch)
}

fn record_id(obj: &Map<String, Value>) -> Result<CitizenId> {
  citizen_id(
    obj
      .get(CITIZEN_ID)
      .ok_or(ValidationError::MissingField(CITIZEN_ID))?,
  )
}

fn into_citizen(citizen_id: CitizenId, patch: CitizenPatch) -> Result<Citizen> {
  Ok(Citizen {
    citizen_id,
    town: patch.town.ok_or(ValidationError::MissingField("town"))?,
    street: patch.street.ok_or(ValidationError::MissingField("street"))?,
    building: patch.building.ok_or(ValidationError::MissingField("building"))?,
    apartment: patch.apartment.ok_or(ValidationError::MissingField("apartment"))?,
    name: patch.name.ok_or(ValidationError::MissingField("name"))?,
    birth_date: patch.birth_date.ok_or(ValidationError::MissingField("birth_date"))?,
    gender: patch.gender.ok_or(ValidationError::MissingField("gender"))?,
    relatives: patch.relatives.ok_or(ValidationError::MissingField("relatives"))?,
  })
}

/// Validate a whole import batch.
///
/// Records are checked in order: `citizen_id` first, which must be unique
/// across the batch, then the rest of the record. Once every record passes,
/// every relative id must name a citizen of the batch. Nothing is returned
/// unless the whole batch is valid.
pub fn validate_import(records: &[Value]) -> Result<Vec<Citizen>> {
  let mut ids = HashSet::with_capacity(records.len());
  let mut referenced = BTreeSet::new();
  let mut citizens = Vec::with_capacity(records.len());

  for raw in records {
    let id = record_id(as_object(raw)?)?;
    if !ids.insert(id) {
      return Err(ValidationError::DuplicateCitizenId(id));
    }
    let citizen = validate_record(raw)?;
    referenced.extend(citizen.relatives.iter().copied());
    citizens.push(citizen);
  }

  if let Some(dangling) = referenced.into_iter().find(|id| !ids.contains(id)) {
    return Err(ValidationError::UnknownRelative(dangling));
  }

  Ok(citizens)
}

/// Validate a partial update payload.
///
/// The payload must be a non-empty object that does not mention
/// `citizen_id`; every key must be a registry field with a valid value.
pub fn validate_patch(raw: &Value) -> Result<CitizenPatch> {
  let obj = as_object(raw)?;
  if obj.is_empty() {
    return Err(ValidationError::EmptyPatch);
  }
  if obj.contains_key(CITIZEN_ID) {
    return Err(ValidationError::CitizenIdImmutable);
  }

  let mut patch = CitizenPatch::default();
  for (key, v) in obj {
    let (field, validator) =
      lookup(key).ok_or_else(|| ValidationError::UnknownField(key.clone()))?;
    check(field, validator, v)?.apply(&mut patch);
  }
  Ok(patch)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn sample(id: i64, relatives: Value) -> Value {
    json!({
      "citizen_id": id,
      "town": "M",
      "street": "S",
      "building": "B",
      "apartment": 1,
      "name": "N",
      "birth_date": "26.12.1986",
      "gender": "male",
      "relatives": relatives,
    })
  }

  fn with(field: &str, value: Value) -> Value {
    let mut v = sample(1, json!([]));
    v[field] = value;
    v
  }

  fn invalid_field(raw: &Value) -> &'static str {
    match validate_record(raw) {
      Err(ValidationError::InvalidField { field, .. }) => field,
      other => panic!("expected InvalidField, got {other:?}"),
    }
  }

  #[test]
  fn accepts_a_complete_record() {
    let c = validate_record(&sample(1, json!([2, 3]))).unwrap();
    assert_eq!(c.citizen_id, 1);
    assert_eq!(c.town, "M");
    assert_eq!(c.birth_date, NaiveDate::from_ymd_opt(1986, 12, 26).unwrap());
    assert_eq!(c.gender, Gender::Male);
    assert_eq!(c.relatives, vec![2, 3]);
  }

  #[test]
  fn rejects_each_malformed_field() {
    assert_eq!(invalid_field(&with("citizen_id", json!(-1))), "citizen_id");
    assert_eq!(invalid_field(&with("citizen_id", json!("1"))), "citizen_id");
    assert_eq!(invalid_field(&with("apartment", json!(-1))), "apartment");
    assert_eq!(invalid_field(&with("apartment", json!("WRONG-STRING"))), "apartment");
    assert_eq!(invalid_field(&with("apartment", json!(1.5))), "apartment");
    assert_eq!(invalid_field(&with("town", json!(""))), "town");
    assert_eq!(invalid_field(&with("town", json!("--- !"))), "town");
    assert_eq!(invalid_field(&with("street", json!(""))), "street");
    assert_eq!(invalid_field(&with("building", json!(""))), "building");
    assert_eq!(invalid_field(&with("name", json!(""))), "name");
    assert_eq!(invalid_field(&with("name", Value::Null)), "name");
    assert_eq!(invalid_field(&with("birth_date", json!("NOT-DATE-FORMAT"))), "birth_date");
    assert_eq!(invalid_field(&with("birth_date", json!("31.02.2019"))), "birth_date");
    assert_eq!(invalid_field(&with("gender", json!("Male"))), "gender");
    assert_eq!(invalid_field(&with("relatives", json!(["a", "b", "c"]))), "relatives");
    assert_eq!(invalid_field(&with("relatives", json!(2))), "relatives");
    assert_eq!(invalid_field(&with("relatives", json!([2, 1.5]))), "relatives");
  }

  #[test]
  fn address_parts_accept_any_script() {
    let c = validate_record(&with("building", json!("16к7стр5"))).unwrap();
    assert_eq!(c.building, "16к7стр5");
    assert!(validate_record(&with("town", json!("Санкт-Петербург"))).is_ok());
  }

  #[test]
  fn rejects_missing_and_unknown_fields() {
    let mut missing = sample(1, json!([]));
    missing.as_object_mut().unwrap().remove("gender");
    assert_eq!(validate_record(&missing), Err(ValidationError::MissingField("gender")));

    let unknown = with("nickname", json!("x"));
    assert_eq!(
      validate_record(&unknown),
      Err(ValidationError::UnknownField("nickname".into()))
    );

    assert_eq!(validate_record(&json!([1])), Err(ValidationError::NotAnObject("a list")));
  }

  #[test]
  fn duplicate_relatives_collapse() {
    let c = validate_record(&sample(1, json!([3, 2, 3, 2]))).unwrap();
    assert_eq!(c.relatives, vec![3, 2]);
  }

  #[test]
  fn relatives_accept_any_integer() {
    let patch = validate_patch(&json!({"relatives": [2, -5]})).unwrap();
    assert_eq!(patch.relatives, Some(vec![2, -5]));

    // Still dangling at ingestion time.
    let batch = [sample(1, json!([-5]))];
    assert_eq!(validate_import(&batch), Err(ValidationError::UnknownRelative(-5)));
  }

  #[test]
  fn import_rejects_duplicate_ids() {
    let batch = [sample(1, json!([])), sample(2, json!([])), sample(1, json!([]))];
    assert_eq!(validate_import(&batch), Err(ValidationError::DuplicateCitizenId(1)));
  }

  #[test]
  fn import_rejects_dangling_relatives() {
    let batch = [sample(1, json!([3])), sample(2, json!([2]))];
    assert_eq!(validate_import(&batch), Err(ValidationError::UnknownRelative(3)));
  }

  #[test]
  fn import_accepts_closed_batches() {
    let batch = [
      sample(1, json!([2, 3])),
      sample(2, json!([1])),
      sample(3, json!([1])),
      sample(4, json!([])),
    ];
    let citizens = validate_import(&batch).unwrap();
    assert_eq!(citizens.len(), 4);
    assert!(validate_import(&[]).unwrap().is_empty());
  }

  #[test]
  fn patch_rules() {
    assert_eq!(validate_patch(&json!({})), Err(ValidationError::EmptyPatch));
    assert_eq!(
      validate_patch(&json!({"citizen_id": 2})),
      Err(ValidationError::CitizenIdImmutable)
    );
    assert_eq!(
      validate_patch(&json!({"shoe_size": 44})),
      Err(ValidationError::UnknownField("shoe_size".into()))
    );
    assert!(matches!(
      validate_patch(&json!({"name": null})),
      Err(ValidationError::InvalidField { field: "name", .. })
    ));

    let patch = validate_patch(&json!({"name": "Z", "relatives": [2, 5]})).unwrap();
    assert_eq!(patch.name.as_deref(), Some("Z"));
    assert_eq!(patch.relatives, Some(vec![2, 5]));
    assert_eq!(patch.town, None);
  }

  #[test]
  fn registry_covers_every_mutable_field() {
    let names: Vec<_> = FIELDS.iter().map(|(n, _)| *n).collect();
    assert_eq!(
      names,
      ["town", "street", "building", "apartment", "name", "birth_date", "gender", "relatives"]
    );
    assert!(lookup(CITIZEN_ID).is_none());
  }
}

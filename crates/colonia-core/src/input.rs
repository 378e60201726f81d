//! Normalisation of untyped request payloads.
//!
//! Form submissions and JSON bodies arrive as loose key/value maps. This
//! module is the only place that looks at them: it turns a [`Fields`] map into
//! the typed drafts and patches the [`crate::Registry`] accepts, rejecting
//! wrong shapes with [`Error::Validation`].
//!
//! | value kind | accepted forms |
//! |------------|----------------|
//! | number     | JSON number, or a string that parses as a finite number |
//! | flag       | `true`, or the strings `"on"`, `"true"`, `"1"`; anything else is `false` |
//! | conditions | a string or an array of strings; blank entries are dropped |
//! | colony id  | an integer or numeric string; `""` or `null` means no colony |
//!
//! Keys are accepted in both `snake_case` and `camelCase`. `null` is treated
//! the same as an absent key.

use serde_json::{Map, Value};

use crate::{
  Error, RecordKind, Result,
  cat::{CatId, CatPatch, NewCat},
  colony::{ColonyId, ColonyPatch, NewColony},
  id::NextId,
};

/// A loose key/value payload.
pub type Fields = Map<String, Value>;

// ─── Cats ────────────────────────────────────────────────────────────────────

/// Normalise a create payload. `name`, `age` and `weight` are required.
pub fn new_cat(fields: &Fields) -> Result<NewCat> {
  let name = text(fields, &["name"])?
    .ok_or_else(|| Error::validation("name is required"))?;
  let age = number(fields, &["age"])?
    .ok_or_else(|| Error::validation("age must be a number"))?;
  let weight = number(fields, &["weight"])?
    .ok_or_else(|| Error::validation("weight must be a number"))?;

  let new = NewCat {
    name,
    age,
    weight,
    vaccinated: flag(fields, &["vaccinated"]).unwrap_or(false),
    sterilized: flag(fields, &["sterilized"]).unwrap_or(false),
    conditions: conditions(fields)?.unwrap_or_default(),
    colony_id: colony_ref(fields)?.flatten(),
  };
  new.validate()?;
  Ok(new)
}

/// Normalise an update payload. Every field is optional.
pub fn cat_patch(fields: &Fields) -> Result<CatPatch> {
  let patch = CatPatch {
    name:       text(fields, &["name"])?,
    age:        number(fields, &["age"])?,
    weight:     number(fields, &["weight"])?,
    vaccinated: flag(fields, &["vaccinated"]),
    sterilized: flag(fields, &["sterilized"]),
    conditions: conditions(fields)?,
    colony_id:  colony_ref(fields)?,
  };
  patch.validate()?;
  Ok(patch)
}

// ─── Colonies ────────────────────────────────────────────────────────────────

pub fn new_colony(fields: &Fields) -> Result<NewColony> {
  let new = NewColony {
    name:        text(fields, &["name"])?
      .ok_or_else(|| Error::validation("colony name is required"))?,
    phone:       optional_text(fields, &["phone"])?,
    description: optional_text(fields, &["description"])?,
    latitude:    number(fields, &["latitude"])?,
    longitude:   number(fields, &["longitude"])?,
  };
  new.validate()?;
  Ok(new)
}

pub fn colony_patch(fields: &Fields) -> Result<ColonyPatch> {
  let patch = ColonyPatch {
    name:        text(fields, &["name"])?,
    phone:       optional_text(fields, &["phone"])?,
    description: optional_text(fields, &["description"])?,
    latitude:    number(fields, &["latitude"])?,
    longitude:   number(fields, &["longitude"])?,
  };
  patch.validate()?;
  Ok(patch)
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Parse an identifier taken from a URL or form. Blank input is "no id"; input
/// that cannot be an id resolves to no record.
pub fn cat_id(raw: &str) -> Result<Option<CatId>> {
  parse_id(raw, RecordKind::Cat)
}

pub fn colony_id(raw: &str) -> Result<Option<ColonyId>> {
  parse_id(raw, RecordKind::Colony)
}

fn parse_id<T>(raw: &str, kind: RecordKind) -> Result<Option<T>>
where
  T: std::str::FromStr + NextId,
{
  let raw = raw.trim();
  if raw.is_empty() {
    return Ok(None);
  }
  match raw.parse::<T>() {
    Ok(id) if id <= T::MAX => Ok(Some(id)),
    _ => Err(Error::not_found(kind, raw)),
  }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// Fold url-encoded pairs into a [`Fields`] map. A key that repeats (e.g. one
/// `conditions` entry per checkbox) becomes an array in submission order.
pub fn fold_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Fields {
  let mut fields = Fields::new();
  for (key, value) in pairs {
    let value = Value::String(value);
    match fields.get_mut(&key) {
      None => {
        fields.insert(key, value);
      }
      Some(Value::Array(items)) => items.push(value),
      Some(existing) => {
        let first = existing.take();
        *existing = Value::Array(vec![first, value]);
      }
    }
  }
  fields
}

// ─── Field readers ───────────────────────────────────────────────────────────

/// Find the first present, non-null value under `key` or its camelCase form.
fn lookup<'a>(fields: &'a Fields, keys: &[&str]) -> Option<(&'a str, &'a Value)> {
  keys
    .iter()
    .flat_map(|key| [key.to_string(), camel_case(key)])
    .find_map(|key| fields.get_key_value(&key).filter(|(_, v)| !v.is_null()))
    .map(|(key, value)| (key.as_str(), value))
}

fn camel_case(key: &str) -> String {
  let mut out = String::with_capacity(key.len());
  let mut upper = false;
  for ch in key.chars() {
    if ch == '_' {
      upper = true;
    } else if upper {
      out.extend(ch.to_uppercase());
      upper = false;
    } else {
      out.push(ch);
    }
  }
  out
}

/// A required-shape string. Surrounding whitespace is trimmed.
fn text(fields: &Fields, keys: &[&str]) -> Result<Option<String>> {
  match lookup(fields, keys) {
    None => Ok(None),
    Some((_, Value::String(s))) => Ok(Some(s.trim().to_owned())),
    Some((key, _)) => Err(Error::validation(format!("{key} must be a string"))),
  }
}

/// Like [`text`], but an empty string counts as absent.
fn optional_text(fields: &Fields, keys: &[&str]) -> Result<Option<String>> {
  Ok(text(fields, keys)?.filter(|s| !s.is_empty()))
}

fn number(fields: &Fields, keys: &[&str]) -> Result<Option<f64>> {
  let Some((key, value)) = lookup(fields, keys) else {
    return Ok(None);
  };
  let parsed = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  match parsed {
    Some(n) if n.is_finite() => Ok(Some(n)),
    _ => Err(Error::validation(format!("{key} must be a number"))),
  }
}

fn flag(fields: &Fields, keys: &[&str]) -> Option<bool> {
  lookup(fields, keys).map(|(_, value)| match value {
    Value::Bool(b) => *b,
    Value::String(s) => {
      matches!(s.trim().to_ascii_lowercase().as_str(), "on" | "true" | "1")
    }
    Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
    _ => false,
  })
}

fn conditions(fields: &Fields) -> Result<Option<Vec<String>>> {
  let Some((key, value)) = lookup(fields, &["conditions"]) else {
    return Ok(None);
  };
  let items: Vec<&Value> = match value {
    Value::Array(items) => items.iter().collect(),
    single => vec![single],
  };
  items
    .into_iter()
    .filter_map(|item| match item {
      Value::String(s) if s.trim().is_empty() => None,
      Value::String(s) => Some(Ok(s.trim().to_owned())),
      _ => Some(Err(Error::validation(format!("{key} must be strings")))),
    })
    .collect::<Result<Vec<_>>>()
    .map(Some)
}

/// `None` when the key is absent, `Some(None)` when it explicitly clears the
/// colony.
fn colony_ref(fields: &Fields) -> Result<Option<Option<ColonyId>>> {
  let Some(key) = ["colony_id", "colonyId"].into_iter().find(|k| fields.contains_key(*k))
  else {
    return Ok(None);
  };
  let id = match &fields[key] {
    Value::Null => return Ok(Some(None)),
    Value::String(s) if s.trim().is_empty() => return Ok(Some(None)),
    Value::Number(n) => n.as_u64().map(ColonyId),
    Value::String(s) => s.parse().ok(),
    _ => None,
  };
  match id {
    Some(id) if id <= ColonyId::MAX => Ok(Some(Some(id))),
    _ => Err(Error::validation(format!("{key} must be a colony id"))),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn fields(value: Value) -> Fields {
    match value {
      Value::Object(map) => map,
      other => panic!("not an object: {other}"),
    }
  }

  #[test]
  fn new_cat_from_json_body() {
    let cat = new_cat(&fields(json!({
      "name": "Michi",
      "age": 3,
      "weight": 4.2,
      "vaccinated": true,
      "sterilized": false,
      "conditions": ["flu", "sarna"],
      "colonyId": 2,
    })))
    .unwrap();

    assert_eq!(cat.name, "Michi");
    assert_eq!(cat.age, 3.0);
    assert!(cat.vaccinated);
    assert!(!cat.sterilized);
    assert_eq!(cat.conditions, vec!["flu".to_string(), "sarna".to_string()]);
    assert_eq!(cat.colony_id, Some(ColonyId(2)));
  }

  #[test]
  fn new_cat_from_form_pairs() {
    let form = fold_pairs([
      ("name".to_string(), "Luna".to_string()),
      ("age".to_string(), " 5 ".to_string()),
      ("weight".to_string(), "3.5".to_string()),
      ("vaccinated".to_string(), "on".to_string()),
      ("conditions".to_string(), "rabia".to_string()),
      ("conditions".to_string(), "".to_string()),
      ("conditions".to_string(), "otitis".to_string()),
      ("colony_id".to_string(), "".to_string()),
    ]);
    let cat = new_cat(&form).unwrap();

    assert_eq!(cat.age, 5.0);
    assert_eq!(cat.weight, 3.5);
    assert!(cat.vaccinated);
    assert!(!cat.sterilized);
    assert_eq!(cat.conditions, vec!["rabia".to_string(), "otitis".to_string()]);
    assert_eq!(cat.colony_id, None);
  }

  #[test]
  fn single_condition_becomes_one_element_list() {
    let cat = new_cat(&fields(json!({
      "name": "Nube", "age": 1, "weight": 1, "conditions": "flu",
    })))
    .unwrap();
    assert_eq!(cat.conditions, vec!["flu".to_string()]);
  }

  #[test]
  fn empty_name_is_rejected() {
    let err = new_cat(&fields(json!({ "name": "", "age": 2, "weight": 3 }))).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "{err}");
  }

  #[test]
  fn missing_name_is_rejected() {
    let err = new_cat(&fields(json!({ "age": 2, "weight": 3 }))).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn non_numeric_age_is_rejected() {
    for age in [json!("two"), json!(true), json!(""), json!([2])] {
      let err = new_cat(&fields(json!({ "name": "X", "age": age, "weight": 3 })))
        .unwrap_err();
      assert!(matches!(err, Error::Validation(_)));
    }
  }

  #[test]
  fn missing_weight_is_rejected() {
    let err = new_cat(&fields(json!({ "name": "X", "age": 2 }))).unwrap_err();
    assert!(err.to_string().contains("weight"));
  }

  #[test]
  fn flags_accept_only_truthy_forms() {
    for (raw, expected) in [
      (json!(true), true),
      (json!("on"), true),
      (json!("TRUE"), true),
      (json!("1"), true),
      (json!(false), false),
      (json!("off"), false),
      (json!("yes please"), false),
    ] {
      let patch = cat_patch(&fields(json!({ "vaccinated": raw }))).unwrap();
      assert_eq!(patch.vaccinated, Some(expected), "{raw}");
    }
  }

  #[test]
  fn patch_leaves_absent_fields_unset() {
    let patch = cat_patch(&fields(json!({ "weight": "4.5" }))).unwrap();
    assert_eq!(
      patch,
      CatPatch { weight: Some(4.5), ..CatPatch::default() }
    );
  }

  #[test]
  fn patch_null_is_absent_but_clears_colony() {
    let patch = cat_patch(&fields(json!({ "name": null, "colony_id": null }))).unwrap();
    assert_eq!(patch.name, None);
    assert_eq!(patch.colony_id, Some(None));
  }

  #[test]
  fn patch_rejects_blank_name() {
    assert!(cat_patch(&fields(json!({ "name": "   " }))).is_err());
  }

  #[test]
  fn conditions_must_be_strings() {
    assert!(cat_patch(&fields(json!({ "conditions": [1, 2] }))).is_err());
  }

  #[test]
  fn colony_coordinates_parse_from_text() {
    let colony = new_colony(&fields(json!({
      "name": "Parque Norte",
      "phone": "",
      "latitude": "43.36",
      "longitude": -5.84,
    })))
    .unwrap();

    assert_eq!(colony.phone, None);
    assert_eq!(colony.latitude, Some(43.36));
    assert_eq!(colony.longitude, Some(-5.84));
  }

  #[test]
  fn colony_without_name_is_rejected() {
    assert!(new_colony(&fields(json!({ "phone": "600" }))).is_err());
  }

  #[test]
  fn blank_id_is_missing_and_garbage_is_not_found() {
    assert_eq!(cat_id(" ").unwrap(), None);
    assert_eq!(cat_id("12").unwrap(), Some(CatId(12)));
    let err = colony_id("abc").unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: RecordKind::Colony, .. }));
  }

  #[test]
  fn colony_id_beyond_storable_range_is_rejected() {
    let base = json!({ "name": "Michi", "age": 3, "weight": 4.2 });
    for colony in [json!(u64::MAX), json!("9223372036854775808")] {
      let mut body = fields(base.clone());
      body.insert("colonyId".to_string(), colony);
      let err = new_cat(&body).unwrap_err();
      assert!(matches!(err, Error::Validation(_)), "{err:?}");
    }

    let largest = cat_patch(&fields(json!({ "colony_id": i64::MAX }))).unwrap();
    assert_eq!(largest.colony_id, Some(Some(ColonyId::MAX)));
  }

  #[test]
  fn out_of_range_path_id_is_not_found() {
    let err = cat_id("18446744073709551615").unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: RecordKind::Cat, .. }));
  }

  #[test]
  fn fold_pairs_groups_repeated_keys() {
    let folded = fold_pairs([
      ("a".to_string(), "1".to_string()),
      ("b".to_string(), "x".to_string()),
      ("a".to_string(), "2".to_string()),
      ("a".to_string(), "3".to_string()),
    ]);
    assert_eq!(Value::Object(folded), json!({ "a": ["1", "2", "3"], "b": "x" }));
  }
}

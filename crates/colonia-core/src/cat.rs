//! Cat records — the individual animals tracked by the registry.
//!
//! A cat is never physically removed. Deleting one stamps `deleted_at`, after
//! which it drops out of the active listing but stays resolvable by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, colony::ColonyId};

pub use crate::id::CatId;

// ─── Cat ─────────────────────────────────────────────────────────────────────

/// A persisted cat record.
///
/// Health-relevant fields default when absent from persisted data: missing
/// flags read as `false` and missing conditions as an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cat {
  pub id:         CatId,
  pub name:       String,
  /// Age in years.
  pub age:        f64,
  /// Weight in kilograms.
  pub weight:     f64,
  #[serde(default)]
  pub vaccinated: bool,
  /// Whether the cat has been through the trap-neuter-return protocol.
  #[serde(default)]
  pub sterilized: bool,
  /// Known health conditions, in the order they were recorded.
  #[serde(default)]
  pub conditions: Vec<String>,
  /// The colony the cat belongs to. Not required to resolve.
  #[serde(default)]
  pub colony_id:  Option<ColonyId>,
  /// Soft-delete marker; `None` while the cat is active.
  #[serde(default)]
  pub deleted_at: Option<DateTime<Utc>>,
}

impl Cat {
  pub fn is_active(&self) -> bool { self.deleted_at.is_none() }

  /// Merge the fields present in `patch` into this record.
  pub fn apply(&mut self, patch: CatPatch) {
    let CatPatch {
      name,
      age,
      weight,
      vaccinated,
      sterilized,
      conditions,
      colony_id,
    } = patch;

    if let Some(name) = name {
      self.name = name;
    }
    if let Some(age) = age {
      self.age = age;
    }
    if let Some(weight) = weight {
      self.weight = weight;
    }
    if let Some(vaccinated) = vaccinated {
      self.vaccinated = vaccinated;
    }
    if let Some(sterilized) = sterilized {
      self.sterilized = sterilized;
    }
    if let Some(conditions) = conditions {
      self.conditions = conditions;
    }
    if let Some(colony_id) = colony_id {
      self.colony_id = colony_id;
    }
  }

  /// Stamp the soft-delete marker. The first deletion time is kept; returns
  /// `false` if the cat was already deleted.
  pub fn mark_deleted(&mut self, at: DateTime<Utc>) -> bool {
    if self.deleted_at.is_some() {
      return false;
    }
    self.deleted_at = Some(at);
    true
  }
}

// ─── NewCat ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::create_cat`]. The id is always
/// assigned by the store and new cats are always active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCat {
  pub name:       String,
  pub age:        f64,
  pub weight:     f64,
  pub vaccinated: bool,
  pub sterilized: bool,
  pub conditions: Vec<String>,
  pub colony_id:  Option<ColonyId>,
}

impl NewCat {
  /// Convenience constructor with flags cleared and no conditions or colony.
  pub fn new(name: impl Into<String>, age: f64, weight: f64) -> Self {
    Self {
      name: name.into(),
      age,
      weight,
      vaccinated: false,
      sterilized: false,
      conditions: Vec::new(),
      colony_id: None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)?;
    validate_measure("age", self.age)?;
    validate_measure("weight", self.weight)
  }

  /// Materialise the record under a store-assigned id.
  pub fn into_cat(self, id: CatId) -> Cat {
    Cat {
      id,
      name: self.name,
      age: self.age,
      weight: self.weight,
      vaccinated: self.vaccinated,
      sterilized: self.sterilized,
      conditions: self.conditions,
      colony_id: self.colony_id,
      deleted_at: None,
    }
  }
}

// ─── CatPatch ────────────────────────────────────────────────────────────────

/// A partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatPatch {
  pub name:       Option<String>,
  pub age:        Option<f64>,
  pub weight:     Option<f64>,
  pub vaccinated: Option<bool>,
  pub sterilized: Option<bool>,
  pub conditions: Option<Vec<String>>,
  /// `Some(None)` detaches the cat from its colony.
  pub colony_id:  Option<Option<ColonyId>>,
}

impl CatPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      validate_name(name)?;
    }
    if let Some(age) = self.age {
      validate_measure("age", age)?;
    }
    if let Some(weight) = self.weight {
      validate_measure("weight", weight)?;
    }
    Ok(())
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::validation("name must not be empty"));
  }
  Ok(())
}

fn validate_measure(field: &str, value: f64) -> Result<()> {
  if !value.is_finite() {
    return Err(Error::validation(format!("{field} must be a number")));
  }
  Ok(())
}

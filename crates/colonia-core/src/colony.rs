//! Colony records — the places community cats are tracked in.
//!
//! Colonies carry no health status and are removed outright on deletion.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use crate::id::ColonyId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colony {
  pub id:          ColonyId,
  pub name:        String,
  /// Contact number of the colony's caretaker.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latitude:    Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub longitude:   Option<f64>,
}

impl Colony {
  /// Merge the fields present in `patch` into this record.
  pub fn apply(&mut self, patch: ColonyPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if patch.phone.is_some() {
      self.phone = patch.phone;
    }
    if patch.description.is_some() {
      self.description = patch.description;
    }
    if patch.latitude.is_some() {
      self.latitude = patch.latitude;
    }
    if patch.longitude.is_some() {
      self.longitude = patch.longitude;
    }
  }
}

/// Input to [`crate::store::RecordStore::create_colony`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewColony {
  pub name:        String,
  pub phone:       Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
}

impl NewColony {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<()> {
    validate_name(&self.name)
  }

  pub fn into_colony(self, id: ColonyId) -> Colony {
    Colony {
      id,
      name: self.name,
      phone: self.phone,
      description: self.description,
      latitude: self.latitude,
      longitude: self.longitude,
    }
  }
}

/// A partial colony update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColonyPatch {
  pub name:        Option<String>,
  pub phone:       Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
}

impl ColonyPatch {
  pub fn validate(&self) -> Result<()> {
    match &self.name {
      Some(name) => validate_name(name),
      None => Ok(()),
    }
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::validation("colony name must not be empty"));
  }
  Ok(())
}

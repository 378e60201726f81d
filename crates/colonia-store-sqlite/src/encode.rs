//! Encoding and decoding helpers between Colonia records and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, conditions as a compact JSON
//! array, identifiers as the table's integer row id.

use chrono::{DateTime, Utc};
use colonia_core::{
  cat::{Cat, CatId},
  colony::{Colony, ColonyId},
};

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn encode_id(id: u64) -> Result<i64> {
  i64::try_from(id).map_err(|_| Error::InvalidId(id.to_string()))
}

pub fn decode_id(raw: i64) -> Result<u64> {
  u64::try_from(raw).map_err(|_| Error::InvalidId(raw.to_string()))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Conditions ──────────────────────────────────────────────────────────────

pub fn encode_conditions(conditions: &[String]) -> Result<String> {
  Ok(serde_json::to_string(conditions)?)
}

pub fn decode_conditions(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCat`]'s field order.
pub const CAT_COLUMNS: &str =
  "id, name, age, weight, vaccinated, sterilized, conditions, colony_id, deleted_at";

/// A `cats` row as read from SQLite, before decoding.
pub struct RawCat {
  pub id:         i64,
  pub name:       String,
  pub age:        f64,
  pub weight:     f64,
  pub vaccinated: bool,
  pub sterilized: bool,
  pub conditions: String,
  pub colony_id:  Option<i64>,
  pub deleted_at: Option<String>,
}

impl RawCat {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      age:        row.get(2)?,
      weight:     row.get(3)?,
      vaccinated: row.get(4)?,
      sterilized: row.get(5)?,
      conditions: row.get(6)?,
      colony_id:  row.get(7)?,
      deleted_at: row.get(8)?,
    })
  }

  pub fn into_cat(self) -> Result<Cat> {
    Ok(Cat {
      id:         CatId(decode_id(self.id)?),
      name:       self.name,
      age:        self.age,
      weight:     self.weight,
      vaccinated: self.vaccinated,
      sterilized: self.sterilized,
      conditions: decode_conditions(&self.conditions)?,
      colony_id:  self.colony_id.map(decode_id).transpose()?.map(ColonyId),
      deleted_at: self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Column list matching [`RawColony`]'s field order.
pub const COLONY_COLUMNS: &str = "id, name, phone, description, latitude, longitude";

/// A `colonies` row as read from SQLite.
pub struct RawColony {
  pub id:          i64,
  pub name:        String,
  pub phone:       Option<String>,
  pub description: Option<String>,
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
}

impl RawColony {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      phone:       row.get(2)?,
      description: row.get(3)?,
      latitude:    row.get(4)?,
      longitude:   row.get(5)?,
    })
  }

  pub fn into_colony(self) -> Result<Colony> {
    Ok(Colony {
      id:          ColonyId(decode_id(self.id)?),
      name:        self.name,
      phone:       self.phone,
      description: self.description,
      latitude:    self.latitude,
      longitude:   self.longitude,
    })
  }
}

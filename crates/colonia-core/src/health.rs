//! Health classification.
//!
//! A cat's health status is derived, never stored. Known conditions dominate;
//! missing preventive care (vaccination or sterilisation) is the next tier
//! down; full compliance with no known conditions is healthy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cat::Cat;

/// Severity category, ordered most severe first so that sorting ascending
/// puts the cats needing attention at the top.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
  Critical,
  Moderate,
  Healthy,
}

impl HealthStatus {
  pub const ALL: [Self; 3] = [Self::Critical, Self::Moderate, Self::Healthy];

  /// Sort key: `Critical` is 0, `Moderate` 1, `Healthy` 2.
  pub fn severity_rank(self) -> u8 {
    match self {
      Self::Critical => 0,
      Self::Moderate => 1,
      Self::Healthy => 2,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Critical => "CRITICAL",
      Self::Moderate => "MODERATE",
      Self::Healthy => "HEALTHY",
    }
  }
}

impl fmt::Display for HealthStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The subset of a cat record the classifier looks at.
///
/// `Default` is the fail-closed reading of a record with nothing filled in:
/// both flags unset, no known conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthSignals<'a> {
  pub vaccinated: bool,
  pub sterilized: bool,
  pub conditions: &'a [String],
}

impl HealthSignals<'_> {
  pub fn classify(&self) -> HealthStatus {
    if !self.conditions.is_empty() {
      HealthStatus::Critical
    } else if !self.vaccinated || !self.sterilized {
      HealthStatus::Moderate
    } else {
      HealthStatus::Healthy
    }
  }
}

impl<'a> From<&'a Cat> for HealthSignals<'a> {
  fn from(cat: &'a Cat) -> Self {
    Self {
      vaccinated: cat.vaccinated,
      sterilized: cat.sterilized,
      conditions: &cat.conditions,
    }
  }
}

/// Classify a cat record. Pure; age and weight play no part.
pub fn classify(cat: &Cat) -> HealthStatus { HealthSignals::from(cat).classify() }

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cat::{CatId, NewCat};

  fn cat(vaccinated: bool, sterilized: bool, conditions: &[&str]) -> Cat {
    let mut new = NewCat::new("Luna", 5.0, 3.5);
    new.vaccinated = vaccinated;
    new.sterilized = sterilized;
    new.conditions = conditions.iter().map(|c| c.to_string()).collect();
    new.into_cat(CatId(1))
  }

  #[test]
  fn any_condition_is_critical_regardless_of_flags() {
    for vaccinated in [false, true] {
      for sterilized in [false, true] {
        let c = cat(vaccinated, sterilized, &["rabia"]);
        assert_eq!(classify(&c), HealthStatus::Critical);
      }
    }
  }

  #[test]
  fn missing_preventive_care_is_moderate() {
    assert_eq!(classify(&cat(false, true, &[])), HealthStatus::Moderate);
    assert_eq!(classify(&cat(true, false, &[])), HealthStatus::Moderate);
    assert_eq!(classify(&cat(false, false, &[])), HealthStatus::Moderate);
  }

  #[test]
  fn full_compliance_without_conditions_is_healthy() {
    assert_eq!(classify(&cat(true, true, &[])), HealthStatus::Healthy);
  }

  #[test]
  fn age_and_weight_do_not_affect_status() {
    let mut c = cat(true, true, &[]);
    c.age = 0.0;
    c.weight = -3.0;
    assert_eq!(classify(&c), HealthStatus::Healthy);
  }

  #[test]
  fn empty_signals_fail_closed() {
    assert_eq!(HealthSignals::default().classify(), HealthStatus::Moderate);
  }

  #[test]
  fn ordering_matches_severity_rank() {
    let mut all = HealthStatus::ALL;
    all.reverse();
    all.sort();
    assert_eq!(all, HealthStatus::ALL);
    for pair in HealthStatus::ALL.windows(2) {
      assert!(pair[0].severity_rank() < pair[1].severity_rank());
    }
  }

  #[test]
  fn serialises_as_upper_case_label() {
    let json = serde_json::to_string(&HealthStatus::Critical).unwrap();
    assert_eq!(json, "\"CRITICAL\"");
    assert_eq!(HealthStatus::Moderate.to_string(), "MODERATE");
  }
}

//! The active listing pipeline: drop soft-deleted cats, classify the rest and
//! order them most severe first.

use serde::{Deserialize, Serialize};

use crate::{
  cat::Cat,
  health::{HealthStatus, classify},
};

/// A cat bundled with its freshly computed health status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCat {
  #[serde(flatten)]
  pub cat:    Cat,
  pub health: HealthStatus,
}

impl ClassifiedCat {
  pub fn new(cat: Cat) -> Self {
    let health = classify(&cat);
    Self { cat, health }
  }
}

/// Build the active listing from a collection in store order.
///
/// The sort is stable: cats of equal severity keep the relative order the
/// store returned them in.
pub fn rank_active(cats: impl IntoIterator<Item = Cat>) -> Vec<ClassifiedCat> {
  let mut listing: Vec<ClassifiedCat> = cats
    .into_iter()
    .filter(Cat::is_active)
    .map(ClassifiedCat::new)
    .collect();
  listing.sort_by_key(|entry| entry.health.severity_rank());
  listing
}

/// Per-status counts over a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
  pub critical: usize,
  pub moderate: usize,
  pub healthy:  usize,
}

impl HealthSummary {
  pub fn tally<'a>(listing: impl IntoIterator<Item = &'a ClassifiedCat>) -> Self {
    listing.into_iter().fold(Self::default(), |mut acc, entry| {
      match entry.health {
        HealthStatus::Critical => acc.critical += 1,
        HealthStatus::Moderate => acc.moderate += 1,
        HealthStatus::Healthy => acc.healthy += 1,
      }
      acc
    })
  }

  pub fn total(&self) -> usize { self.critical + self.moderate + self.healthy }
}

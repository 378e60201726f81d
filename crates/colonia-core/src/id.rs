//! Store-assigned record identifiers.
//!
//! Identifiers are positive integers handed out by the store in increasing
//! order. Persisted data written by older tooling sometimes carries them as
//! numeric strings, so deserialisation accepts both forms; serialisation
//! always writes a plain integer.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
  Number(u64),
  Text(String),
}

fn deserialize_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  match Lenient::deserialize(deserializer)? {
    Lenient::Number(n) => Ok(n),
    Lenient::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
  }
}

macro_rules! record_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub u64);

    impl NextId for $name {
      const FIRST: Self = Self(1);
      const MAX: Self = Self(i64::MAX as u64);

      fn successor(self) -> Option<Self> {
        (self < Self::MAX).then(|| Self(self.0 + 1))
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl FromStr for $name {
      type Err = ParseIntError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
      where
        D: Deserializer<'de>,
      {
        deserialize_lenient(deserializer).map(Self)
      }
    }
  };
}

record_id! {
  /// Identifier of a [`Cat`](crate::cat::Cat).
  CatId
}

record_id! {
  /// Identifier of a [`Colony`](crate::colony::Colony).
  ColonyId
}

/// Implemented by identifier newtypes so stores can allocate generically.
///
/// Ids never exceed [`NextId::MAX`], which keeps them representable as a
/// signed 64-bit SQLite integer.
pub trait NextId: Ord + Copy {
  const FIRST: Self;
  const MAX: Self;

  /// The next id, or `None` once [`NextId::MAX`] is reached.
  fn successor(self) -> Option<Self>;
}

/// Returned when a collection already holds the largest allocatable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("identifier space exhausted")]
pub struct IdSpaceExhausted;

/// Allocate the id following the largest one in `ids`, or
/// [`NextId::FIRST`] when there are none.
pub fn next_id<T: NextId>(
  ids: impl IntoIterator<Item = T>,
) -> Result<T, IdSpaceExhausted> {
  match ids.into_iter().max() {
    None => Ok(T::FIRST),
    Some(last) => last.successor().ok_or(IdSpaceExhausted),
  }
}

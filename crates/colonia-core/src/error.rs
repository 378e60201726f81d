//! Error types for `colonia-core`.

use std::fmt;

use thiserror::Error;

/// The two record collections the registry manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
  Cat,
  Colony,
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Cat => f.write_str("cat"),
      Self::Colony => f.write_str("colony"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing or has the wrong shape.
  #[error("invalid input: {0}")]
  Validation(String),

  /// An operation that needs an identifier was invoked without one.
  #[error("no {0} identifier supplied")]
  MissingIdentifier(RecordKind),

  /// An identifier was supplied but resolves to no record.
  #[error("{kind} not found: {id}")]
  NotFound { kind: RecordKind, id: String },

  /// The record store failed. Never retried.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  pub fn not_found(kind: RecordKind, id: impl fmt::Display) -> Self {
    Self::NotFound { kind, id: id.to_string() }
  }

  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

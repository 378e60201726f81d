//! Error type for `colonia-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A row id outside the range record identifiers can hold.
  #[error("invalid record id: {0}")]
  InvalidId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

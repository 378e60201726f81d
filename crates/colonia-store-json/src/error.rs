//! Error type for `colonia-store-json`.

use std::{io, path::PathBuf};

use colonia_core::id::IdSpaceExhausted;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot access {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed records in {path:?}: {source}")]
  Malformed {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("cannot encode records: {0}")]
  Encode(#[from] serde_json::Error),

  #[error(transparent)]
  IdSpaceExhausted(#[from] IdSpaceExhausted),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

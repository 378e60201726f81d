//! Whole-file reads and writes of a JSON record array.

use std::{io, path::Path};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Read the array stored at `path`. A missing or blank file is an empty
/// collection.
pub async fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(source) => return Err(Error::Io { path: path.to_owned(), source }),
  };

  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(Vec::new());
  }

  serde_json::from_slice(&bytes)
    .map_err(|source| Error::Malformed { path: path.to_owned(), source })
}

/// Replace the array stored at `path`.
///
/// The data is written to a sibling temporary file first and renamed over the
/// target, so readers never observe a half-written file.
pub async fn write_all<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
  let mut bytes = serde_json::to_vec_pretty(records)?;
  bytes.push(b'\n');

  let tmp = path.with_extension("json.tmp");
  tokio::fs::write(&tmp, &bytes)
    .await
    .map_err(|source| Error::Io { path: tmp.clone(), source })?;
  tokio::fs::rename(&tmp, path)
    .await
    .map_err(|source| Error::Io { path: path.to_owned(), source })?;
  Ok(())
}

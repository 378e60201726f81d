//! [`JsonStore`] — the flat-file implementation of [`RecordStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use colonia_core::{
  cat::{Cat, CatId, NewCat},
  colony::{Colony, ColonyId, NewColony},
  id::next_id,
  store::RecordStore,
};

use crate::{
  Error, Result,
  files::{read_all, write_all},
};

const CATS_FILE: &str = "cats.json";
const COLONIES_FILE: &str = "colonies.json";

/// A record store backed by two JSON files in one directory.
///
/// Each method holds an async mutex for its whole read-modify-write cycle, so
/// calls on the same `JsonStore` never interleave. Separate processes writing
/// the same directory are not coordinated.
#[derive(Debug)]
pub struct JsonStore {
  dir:  PathBuf,
  lock: Mutex<()>,
}

impl JsonStore {
  /// Open a store rooted at `dir`, creating the directory if needed. The
  /// files themselves are created on first write.
  pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|source| Error::Io { path: dir.clone(), source })?;
    tracing::debug!(dir = %dir.display(), "json store opened");
    Ok(Self { dir, lock: Mutex::new(()) })
  }

  pub fn dir(&self) -> &Path { &self.dir }

  fn cats_path(&self) -> PathBuf { self.dir.join(CATS_FILE) }

  fn colonies_path(&self) -> PathBuf { self.dir.join(COLONIES_FILE) }
}

impl RecordStore for JsonStore {
  type Error = Error;

  // ── Cats ──────────────────────────────────────────────────────────────────

  async fn list_cats(&self) -> Result<Vec<Cat>> {
    let _guard = self.lock.lock().await;
    read_all(&self.cats_path()).await
  }

  async fn get_cat(&self, id: CatId) -> Result<Option<Cat>> {
    let _guard = self.lock.lock().await;
    let cats: Vec<Cat> = read_all(&self.cats_path()).await?;
    Ok(cats.into_iter().find(|c| c.id == id))
  }

  async fn create_cat(&self, input: NewCat) -> Result<Cat> {
    let _guard = self.lock.lock().await;
    let path = self.cats_path();
    let mut cats: Vec<Cat> = read_all(&path).await?;

    let cat = input.into_cat(next_id(cats.iter().map(|c| c.id))?);
    cats.push(cat.clone());
    write_all(&path, &cats).await?;
    Ok(cat)
  }

  async fn save_cat(&self, cat: Cat) -> Result<Option<Cat>> {
    let _guard = self.lock.lock().await;
    let path = self.cats_path();
    let mut cats: Vec<Cat> = read_all(&path).await?;

    let Some(slot) = cats.iter_mut().find(|c| c.id == cat.id) else {
      return Ok(None);
    };
    *slot = cat.clone();
    write_all(&path, &cats).await?;
    Ok(Some(cat))
  }

  async fn delete_cat_soft(&self, id: CatId) -> Result<Option<Cat>> {
    let _guard = self.lock.lock().await;
    let path = self.cats_path();
    let mut cats: Vec<Cat> = read_all(&path).await?;

    let Some(cat) = cats.iter_mut().find(|c| c.id == id) else {
      return Ok(None);
    };
    let stamped = cat.mark_deleted(Utc::now());
    let cat = cat.clone();
    if stamped {
      write_all(&path, &cats).await?;
    }
    Ok(Some(cat))
  }

  // ── Colonies ──────────────────────────────────────────────────────────────

  async fn list_colonies(&self) -> Result<Vec<Colony>> {
    let _guard = self.lock.lock().await;
    read_all(&self.colonies_path()).await
  }

  async fn get_colony(&self, id: ColonyId) -> Result<Option<Colony>> {
    let _guard = self.lock.lock().await;
    let colonies: Vec<Colony> = read_all(&self.colonies_path()).await?;
    Ok(colonies.into_iter().find(|c| c.id == id))
  }

  async fn create_colony(&self, input: NewColony) -> Result<Colony> {
    let _guard = self.lock.lock().await;
    let path = self.colonies_path();
    let mut colonies: Vec<Colony> = read_all(&path).await?;

    let colony = input.into_colony(next_id(colonies.iter().map(|c| c.id))?);
    colonies.push(colony.clone());
    write_all(&path, &colonies).await?;
    Ok(colony)
  }

  async fn save_colony(&self, colony: Colony) -> Result<Option<Colony>> {
    let _guard = self.lock.lock().await;
    let path = self.colonies_path();
    let mut colonies: Vec<Colony> = read_all(&path).await?;

    let Some(slot) = colonies.iter_mut().find(|c| c.id == colony.id) else {
      return Ok(None);
    };
    *slot = colony.clone();
    write_all(&path, &colonies).await?;
    Ok(Some(colony))
  }

  async fn delete_colony_hard(&self, id: ColonyId) -> Result<bool> {
    let _guard = self.lock.lock().await;
    let path = self.colonies_path();
    let mut colonies: Vec<Colony> = read_all(&path).await?;

    let before = colonies.len();
    colonies.retain(|c| c.id != id);
    if colonies.len() == before {
      return Ok(false);
    }
    write_all(&path, &colonies).await?;
    Ok(true)
  }
}

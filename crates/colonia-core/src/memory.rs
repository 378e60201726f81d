//! [`MemoryStore`] — a [`RecordStore`] that keeps everything in process
//! memory. Used by tests and handy for demos; nothing survives a restart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::{
  cat::{Cat, CatId, NewCat},
  colony::{Colony, ColonyId, NewColony},
  id::{IdSpaceExhausted, next_id},
  store::RecordStore,
};

#[derive(Debug, Default)]
struct Collections {
  cats:     Vec<Cat>,
  colonies: Vec<Colony>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  inner: Mutex<Collections>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Seed the store with existing records, kept in the given order.
  pub fn with_records(cats: Vec<Cat>, colonies: Vec<Colony>) -> Self {
    Self { inner: Mutex::new(Collections { cats, colonies }) }
  }

  fn lock(&self) -> MutexGuard<'_, Collections> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl RecordStore for MemoryStore {
  type Error = IdSpaceExhausted;

  async fn list_cats(&self) -> Result<Vec<Cat>, IdSpaceExhausted> {
    Ok(self.lock().cats.clone())
  }

  async fn get_cat(&self, id: CatId) -> Result<Option<Cat>, IdSpaceExhausted> {
    Ok(self.lock().cats.iter().find(|c| c.id == id).cloned())
  }

  async fn create_cat(&self, input: NewCat) -> Result<Cat, IdSpaceExhausted> {
    let mut inner = self.lock();
    let id = next_id(inner.cats.iter().map(|c| c.id))?;
    let cat = input.into_cat(id);
    inner.cats.push(cat.clone());
    Ok(cat)
  }

  async fn save_cat(&self, cat: Cat) -> Result<Option<Cat>, IdSpaceExhausted> {
    let mut inner = self.lock();
    Ok(inner.cats.iter_mut().find(|c| c.id == cat.id).map(|slot| {
      *slot = cat;
      slot.clone()
    }))
  }

  async fn delete_cat_soft(&self, id: CatId) -> Result<Option<Cat>, IdSpaceExhausted> {
    let mut inner = self.lock();
    Ok(inner.cats.iter_mut().find(|c| c.id == id).map(|cat| {
      cat.mark_deleted(Utc::now());
      cat.clone()
    }))
  }

  async fn list_colonies(&self) -> Result<Vec<Colony>, IdSpaceExhausted> {
    Ok(self.lock().colonies.clone())
  }

  async fn get_colony(&self, id: ColonyId) -> Result<Option<Colony>, IdSpaceExhausted> {
    Ok(self.lock().colonies.iter().find(|c| c.id == id).cloned())
  }

  async fn create_colony(&self, input: NewColony) -> Result<Colony, IdSpaceExhausted> {
    let mut inner = self.lock();
    let id = next_id(inner.colonies.iter().map(|c| c.id))?;
    let colony = input.into_colony(id);
    inner.colonies.push(colony.clone());
    Ok(colony)
  }

  async fn save_colony(&self, colony: Colony) -> Result<Option<Colony>, IdSpaceExhausted> {
    let mut inner = self.lock();
    Ok(inner.colonies.iter_mut().find(|c| c.id == colony.id).map(|slot| {
      *slot = colony;
      slot.clone()
    }))
  }

  async fn delete_colony_hard(&self, id: ColonyId) -> Result<bool, IdSpaceExhausted> {
    let mut inner = self.lock();
    let before = inner.colonies.len();
    inner.colonies.retain(|c| c.id != id);
    Ok(inner.colonies.len() != before)
  }
}

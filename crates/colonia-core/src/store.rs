//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (`colonia-store-json`,
//! `colonia-store-sqlite`, and the in-memory [`crate::memory::MemoryStore`]).
//! The [`crate::Registry`] depends on this abstraction, never on a storage
//! format.

use std::future::Future;

use crate::{
  cat::{Cat, CatId, NewCat},
  colony::{Colony, ColonyId, NewColony},
};

/// Abstraction over a persisted collection of cats and colonies.
///
/// Each call is expected to be atomic with respect to other calls on the same
/// store. Nothing spans calls: a read followed by a write may interleave with
/// another caller's mutation.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cats ──────────────────────────────────────────────────────────────

  /// Every cat, soft-deleted ones included, in store order.
  fn list_cats(
    &self,
  ) -> impl Future<Output = Result<Vec<Cat>, Self::Error>> + Send + '_;

  /// Retrieve a cat by id. Returns `None` if not found.
  fn get_cat(
    &self,
    id: CatId,
  ) -> impl Future<Output = Result<Option<Cat>, Self::Error>> + Send + '_;

  /// Persist a new cat under a freshly assigned id.
  fn create_cat(
    &self,
    input: NewCat,
  ) -> impl Future<Output = Result<Cat, Self::Error>> + Send + '_;

  /// Replace the stored cat with the same id. Returns `None` if there is no
  /// such cat.
  fn save_cat(
    &self,
    cat: Cat,
  ) -> impl Future<Output = Result<Option<Cat>, Self::Error>> + Send + '_;

  /// Stamp `deleted_at` with the current time unless it is already set, and
  /// return the record. Returns `None` if there is no such cat.
  fn delete_cat_soft(
    &self,
    id: CatId,
  ) -> impl Future<Output = Result<Option<Cat>, Self::Error>> + Send + '_;

  // ── Colonies ──────────────────────────────────────────────────────────

  fn list_colonies(
    &self,
  ) -> impl Future<Output = Result<Vec<Colony>, Self::Error>> + Send + '_;

  fn get_colony(
    &self,
    id: ColonyId,
  ) -> impl Future<Output = Result<Option<Colony>, Self::Error>> + Send + '_;

  fn create_colony(
    &self,
    input: NewColony,
  ) -> impl Future<Output = Result<Colony, Self::Error>> + Send + '_;

  /// Replace the stored colony with the same id. Returns `None` if there is
  /// no such colony.
  fn save_colony(
    &self,
    colony: Colony,
  ) -> impl Future<Output = Result<Option<Colony>, Self::Error>> + Send + '_;

  /// Remove a colony outright. Returns `false` if nothing was removed.
  fn delete_colony_hard(
    &self,
    id: ColonyId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

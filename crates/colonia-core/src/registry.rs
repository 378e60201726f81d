//! [`Registry`] — the record lifecycle operations and the active listing.
//!
//! Every cat that leaves the registry carries a freshly computed
//! [`HealthStatus`](crate::health::HealthStatus); nothing about health is ever
//! persisted. Store failures propagate as [`Error::Store`] and are never
//! retried.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
  Error, RecordKind, Result,
  cat::{CatId, CatPatch, NewCat},
  colony::{Colony, ColonyId, ColonyPatch, NewColony},
  listing::{ClassifiedCat, rank_active},
  store::RecordStore,
};

/// Orchestrates validation, persistence and classification over a store.
///
/// Cloning is cheap — the store is reference-counted.
pub struct Registry<S> {
  store: Arc<S>,
}

impl<S> Clone for Registry<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

/// A colony together with its active cats, most severe first.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ColonyDetail {
  #[serde(flatten)]
  pub colony: Colony,
  pub cats:   Vec<ClassifiedCat>,
}

impl<S: RecordStore> Registry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Cats ──────────────────────────────────────────────────────────────────

  /// Active cats paired with their health status, most severe first. Equal
  /// severities keep store order.
  pub async fn list_active(&self) -> Result<Vec<ClassifiedCat>> {
    let cats = self.store.list_cats().await.map_err(Error::store)?;
    Ok(rank_active(cats))
  }

  /// Resolve a cat by id, soft-deleted or not.
  pub async fn get_cat(&self, id: Option<CatId>) -> Result<ClassifiedCat> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Cat))?;
    self
      .store
      .get_cat(id)
      .await
      .map_err(Error::store)?
      .map(ClassifiedCat::new)
      .ok_or_else(|| Error::not_found(RecordKind::Cat, id))
  }

  pub async fn create_cat(&self, input: NewCat) -> Result<ClassifiedCat> {
    input.validate()?;
    let cat = self.store.create_cat(input).await.map_err(Error::store)?;
    let entry = ClassifiedCat::new(cat);
    info!(cat_id = %entry.cat.id, health = %entry.health, "cat created");
    Ok(entry)
  }

  /// Merge `patch` into the stored cat.
  ///
  /// The read and the write are separate store calls; a concurrent update of
  /// the same cat in between is overwritten.
  pub async fn update_cat(
    &self,
    id: Option<CatId>,
    patch: CatPatch,
  ) -> Result<ClassifiedCat> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Cat))?;
    patch.validate()?;

    let mut cat = self
      .store
      .get_cat(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Cat, id))?;
    cat.apply(patch);

    let saved = self
      .store
      .save_cat(cat)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Cat, id))?;
    let entry = ClassifiedCat::new(saved);
    info!(cat_id = %id, health = %entry.health, "cat updated");
    Ok(entry)
  }

  /// Soft-delete a cat. The record stays resolvable through
  /// [`Registry::get_cat`] but leaves the active listing.
  pub async fn delete_cat(&self, id: Option<CatId>) -> Result<ClassifiedCat> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Cat))?;
    let cat = self
      .store
      .delete_cat_soft(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Cat, id))?;
    info!(cat_id = %id, deleted_at = ?cat.deleted_at, "cat deleted");
    Ok(ClassifiedCat::new(cat))
  }

  // ── Colonies ──────────────────────────────────────────────────────────────

  pub async fn list_colonies(&self) -> Result<Vec<Colony>> {
    self.store.list_colonies().await.map_err(Error::store)
  }

  pub async fn get_colony(&self, id: Option<ColonyId>) -> Result<Colony> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Colony))?;
    self
      .store
      .get_colony(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Colony, id))
  }

  /// A colony and the active cats that reference it.
  pub async fn colony_detail(&self, id: Option<ColonyId>) -> Result<ColonyDetail> {
    let colony = self.get_colony(id).await?;
    let cats = self
      .list_active()
      .await?
      .into_iter()
      .filter(|entry| entry.cat.colony_id == Some(colony.id))
      .collect();
    Ok(ColonyDetail { colony, cats })
  }

  pub async fn create_colony(&self, input: NewColony) -> Result<Colony> {
    input.validate()?;
    let colony = self.store.create_colony(input).await.map_err(Error::store)?;
    info!(colony_id = %colony.id, "colony created");
    Ok(colony)
  }

  pub async fn update_colony(
    &self,
    id: Option<ColonyId>,
    patch: ColonyPatch,
  ) -> Result<Colony> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Colony))?;
    patch.validate()?;

    let mut colony = self
      .store
      .get_colony(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Colony, id))?;
    colony.apply(patch);

    let saved = self
      .store
      .save_colony(colony)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(RecordKind::Colony, id))?;
    info!(colony_id = %id, "colony updated");
    Ok(saved)
  }

  /// Remove a colony outright. Cats referencing it keep the dangling id.
  pub async fn delete_colony(&self, id: Option<ColonyId>) -> Result<()> {
    let id = id.ok_or(Error::MissingIdentifier(RecordKind::Colony))?;
    let removed = self
      .store
      .delete_colony_hard(id)
      .await
      .map_err(Error::store)?;
    if !removed {
      return Err(Error::not_found(RecordKind::Colony, id));
    }
    debug!(colony_id = %id, "colony removed");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{fmt, sync::Arc};

  use chrono::Utc;

  use super::*;
  use crate::{
    cat::Cat,
    colony::Colony,
    health::HealthStatus,
    id::NextId,
    memory::MemoryStore,
  };

  fn registry() -> Registry<MemoryStore> { Registry::new(Arc::new(MemoryStore::new())) }

  fn seeded(cats: Vec<Cat>, colonies: Vec<Colony>) -> Registry<MemoryStore> {
    Registry::new(Arc::new(MemoryStore::with_records(cats, colonies)))
  }

  fn stored_cat(id: u64, vaccinated: bool, sterilized: bool, conditions: &[&str]) -> Cat {
    let mut new = NewCat::new(format!("cat-{id}"), 3.0, 4.0);
    new.vaccinated = vaccinated;
    new.sterilized = sterilized;
    new.conditions = conditions.iter().map(|c| c.to_string()).collect();
    new.into_cat(CatId(id))
  }

  fn healthy_input(name: &str) -> NewCat {
    let mut new = NewCat::new(name, 2.0, 3.0);
    new.vaccinated = true;
    new.sterilized = true;
    new
  }

  // ─── Listing ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn listing_puts_critical_first() {
    let r = seeded(
      vec![stored_cat(1, true, true, &[]), stored_cat(2, true, true, &["flu"])],
      vec![],
    );
    let listing = r.list_active().await.unwrap();
    let got: Vec<_> = listing.iter().map(|e| (e.cat.id, e.health)).collect();
    assert_eq!(got, vec![
      (CatId(2), HealthStatus::Critical),
      (CatId(1), HealthStatus::Healthy),
    ]);
  }

  #[tokio::test]
  async fn listing_skips_soft_deleted() {
    let mut gone = stored_cat(1, true, true, &[]);
    gone.deleted_at = Some(Utc::now());
    let r = seeded(vec![gone], vec![]);
    assert!(r.list_active().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn listing_is_idempotent() {
    let r = seeded(
      vec![
        stored_cat(1, false, true, &[]),
        stored_cat(2, true, true, &[]),
        stored_cat(3, false, true, &[]),
        stored_cat(4, true, true, &["virus"]),
      ],
      vec![],
    );
    let first = r.list_active().await.unwrap();
    let second = r.list_active().await.unwrap();
    assert_eq!(first, second);
  }

  // ─── Cat lifecycle ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_assigns_id_and_classifies() {
    let r = registry();
    let first = r.create_cat(healthy_input("Michi")).await.unwrap();
    let second = r.create_cat(NewCat::new("Luna", 5.0, 3.5)).await.unwrap();

    assert_eq!(first.cat.id, CatId(1));
    assert_eq!(second.cat.id, CatId(2));
    assert_eq!(first.health, HealthStatus::Healthy);
    assert_eq!(second.health, HealthStatus::Moderate);
    assert!(first.cat.is_active());
  }

  #[tokio::test]
  async fn create_with_empty_name_is_a_validation_error() {
    let r = registry();
    let err = r.create_cat(NewCat::new("", 2.0, 3.0)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(r.list_active().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_on_empty_store_is_not_found() {
    let r = registry();
    let patch = CatPatch { name: Some("Nadie".into()), ..CatPatch::default() };
    let err = r.update_cat(Some(CatId(99)), patch).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: RecordKind::Cat, .. }), "{err}");
  }

  #[tokio::test]
  async fn update_merges_and_reclassifies() {
    let r = registry();
    let created = r.create_cat(healthy_input("Michi")).await.unwrap();

    let patch = CatPatch {
      conditions: Some(vec!["otitis".into()]),
      ..CatPatch::default()
    };
    let updated = r.update_cat(Some(created.cat.id), patch).await.unwrap();

    assert_eq!(updated.health, HealthStatus::Critical);
    assert_eq!(updated.cat.name, "Michi");
    assert!(updated.cat.vaccinated);
    assert_eq!(r.get_cat(Some(created.cat.id)).await.unwrap(), updated);
  }

  #[tokio::test]
  async fn delete_then_get_returns_deleted_record() {
    let r = registry();
    let created = r.create_cat(healthy_input("Michi")).await.unwrap();

    let deleted = r.delete_cat(Some(created.cat.id)).await.unwrap();
    assert!(deleted.cat.deleted_at.is_some());

    let fetched = r.get_cat(Some(created.cat.id)).await.unwrap();
    assert_eq!(fetched.cat.deleted_at, deleted.cat.deleted_at);
    assert_eq!(fetched.health, HealthStatus::Healthy);
    assert!(r.list_active().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn deleting_twice_keeps_first_timestamp() {
    let r = registry();
    let created = r.create_cat(healthy_input("Michi")).await.unwrap();
    let first = r.delete_cat(Some(created.cat.id)).await.unwrap();
    let second = r.delete_cat(Some(created.cat.id)).await.unwrap();
    assert_eq!(first.cat.deleted_at, second.cat.deleted_at);
  }

  #[tokio::test]
  async fn delete_unknown_cat_is_not_found() {
    let err = registry().delete_cat(Some(CatId(1))).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
  }

  #[tokio::test]
  async fn missing_identifier_is_distinct_from_not_found() {
    let r = registry();
    assert!(matches!(
      r.get_cat(None).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Cat)
    ));
    assert!(matches!(
      r.update_cat(None, CatPatch::default()).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Cat)
    ));
    assert!(matches!(
      r.delete_cat(None).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Cat)
    ));
    assert!(matches!(
      r.delete_colony(None).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Colony)
    ));
    assert!(matches!(
      r.get_colony(None).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Colony)
    ));
    assert!(matches!(
      r.update_colony(None, ColonyPatch::default()).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Colony)
    ));
    assert!(matches!(
      r.colony_detail(None).await.unwrap_err(),
      Error::MissingIdentifier(RecordKind::Colony)
    ));
  }

  // ─── Colonies ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn colony_crud_round() {
    let r = registry();
    let colony = r.create_colony(NewColony::new("Parque Norte")).await.unwrap();
    assert_eq!(colony.id, ColonyId(1));

    let patch = ColonyPatch { phone: Some("600111222".into()), ..ColonyPatch::default() };
    let updated = r.update_colony(Some(colony.id), patch).await.unwrap();
    assert_eq!(updated.name, "Parque Norte");
    assert_eq!(updated.phone.as_deref(), Some("600111222"));

    r.delete_colony(Some(colony.id)).await.unwrap();
    assert!(r.list_colonies().await.unwrap().is_empty());
    assert!(matches!(
      r.get_colony(Some(colony.id)).await.unwrap_err(),
      Error::NotFound { kind: RecordKind::Colony, .. }
    ));
  }

  #[tokio::test]
  async fn deleting_absent_colony_is_not_found() {
    let err = registry().delete_colony(Some(ColonyId(3))).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: RecordKind::Colony, .. }));
  }

  #[tokio::test]
  async fn colony_with_blank_name_is_rejected() {
    let err = registry().create_colony(NewColony::new(" ")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[tokio::test]
  async fn colony_detail_lists_only_its_active_cats() {
    let r = registry();
    let north = r.create_colony(NewColony::new("Norte")).await.unwrap();
    let south = r.create_colony(NewColony::new("Sur")).await.unwrap();

    let mut a = healthy_input("A");
    a.colony_id = Some(north.id);
    let mut b = NewCat::new("B", 1.0, 1.0);
    b.colony_id = Some(north.id);
    let mut c = healthy_input("C");
    c.colony_id = Some(south.id);
    let mut d = healthy_input("D");
    d.colony_id = Some(north.id);

    r.create_cat(a).await.unwrap();
    r.create_cat(b).await.unwrap();
    r.create_cat(c).await.unwrap();
    let d = r.create_cat(d).await.unwrap();
    r.delete_cat(Some(d.cat.id)).await.unwrap();

    let detail = r.colony_detail(Some(north.id)).await.unwrap();
    let names: Vec<_> = detail.cats.iter().map(|e| e.cat.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
  }

  // ─── Store failures ────────────────────────────────────────────────────────

  #[derive(Debug)]
  struct Broken;

  impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("disk on fire") }
  }

  impl std::error::Error for Broken {}

  struct BrokenStore;

  impl RecordStore for BrokenStore {
    type Error = Broken;

    async fn list_cats(&self) -> Result<Vec<Cat>, Broken> { Err(Broken) }
    async fn get_cat(&self, _: CatId) -> Result<Option<Cat>, Broken> { Err(Broken) }
    async fn create_cat(&self, _: NewCat) -> Result<Cat, Broken> { Err(Broken) }
    async fn save_cat(&self, _: Cat) -> Result<Option<Cat>, Broken> { Err(Broken) }
    async fn delete_cat_soft(&self, _: CatId) -> Result<Option<Cat>, Broken> { Err(Broken) }
    async fn list_colonies(&self) -> Result<Vec<Colony>, Broken> { Err(Broken) }
    async fn get_colony(&self, _: ColonyId) -> Result<Option<Colony>, Broken> { Err(Broken) }
    async fn create_colony(&self, _: NewColony) -> Result<Colony, Broken> { Err(Broken) }
    async fn save_colony(&self, _: Colony) -> Result<Option<Colony>, Broken> { Err(Broken) }
    async fn delete_colony_hard(&self, _: ColonyId) -> Result<bool, Broken> { Err(Broken) }
  }

  #[tokio::test]
  async fn store_failures_propagate_unchanged() {
    let r = Registry::new(Arc::new(BrokenStore));
    let err = r.list_active().await.unwrap_err();
    match err {
      Error::Store(source) => assert_eq!(source.to_string(), "disk on fire"),
      other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
      r.create_cat(healthy_input("X")).await.unwrap_err(),
      Error::Store(_)
    ));
  }

  #[tokio::test]
  async fn exhausted_id_space_is_a_store_error() {
    let r = seeded(vec![stored_cat(CatId::MAX.0, true, true, &[])], vec![]);
    let err = r.create_cat(healthy_input("X")).await.unwrap_err();
    match err {
      Error::Store(source) => assert_eq!(source.to_string(), "identifier space exhausted"),
      other => panic!("unexpected error: {other}"),
    }
    assert_eq!(r.list_active().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn validation_runs_before_the_store_is_touched() {
    let r = Registry::new(Arc::new(BrokenStore));
    let err = r.create_cat(NewCat::new("", 1.0, 1.0)).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }
}

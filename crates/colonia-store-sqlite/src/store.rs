//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use colonia_core::{
  cat::{Cat, CatId, NewCat},
  colony::{Colony, ColonyId, NewColony},
  store::RecordStore,
};

use crate::{
  Result,
  encode::{
    CAT_COLUMNS, COLONY_COLUMNS, RawCat, RawColony, decode_id, encode_conditions,
    encode_dt, encode_id,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Colonia record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls are
/// serialised through the connection's worker thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_cat(&self, id: CatId) -> Result<Option<Cat>> {
    let id_val = encode_id(id.0)?;
    let sql = format!("SELECT {CAT_COLUMNS} FROM cats WHERE id = ?1");

    let raw: Option<RawCat> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_val], RawCat::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCat::into_cat).transpose()
  }

  async fn fetch_colony(&self, id: ColonyId) -> Result<Option<Colony>> {
    let id_val = encode_id(id.0)?;
    let sql = format!("SELECT {COLONY_COLUMNS} FROM colonies WHERE id = ?1");

    let raw: Option<RawColony> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_val], RawColony::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawColony::into_colony).transpose()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  // ── Cats ──────────────────────────────────────────────────────────────────

  async fn list_cats(&self) -> Result<Vec<Cat>> {
    let sql = format!("SELECT {CAT_COLUMNS} FROM cats ORDER BY id");

    let raws: Vec<RawCat> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCat::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCat::into_cat).collect()
  }

  async fn get_cat(&self, id: CatId) -> Result<Option<Cat>> { self.fetch_cat(id).await }

  async fn create_cat(&self, input: NewCat) -> Result<Cat> {
    let name           = input.name.clone();
    let age            = input.age;
    let weight         = input.weight;
    let vaccinated     = input.vaccinated;
    let sterilized     = input.sterilized;
    let conditions_str = encode_conditions(&input.conditions)?;
    let colony_val     = input.colony_id.map(|c| encode_id(c.0)).transpose()?;

    let row_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cats (
             name, age, weight, vaccinated, sterilized, conditions, colony_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            name,
            age,
            weight,
            vaccinated,
            sterilized,
            conditions_str,
            colony_val,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(input.into_cat(CatId(decode_id(row_id)?)))
  }

  async fn save_cat(&self, cat: Cat) -> Result<Option<Cat>> {
    let id_val         = encode_id(cat.id.0)?;
    let name           = cat.name.clone();
    let age            = cat.age;
    let weight         = cat.weight;
    let vaccinated     = cat.vaccinated;
    let sterilized     = cat.sterilized;
    let conditions_str = encode_conditions(&cat.conditions)?;
    let colony_val     = cat.colony_id.map(|c| encode_id(c.0)).transpose()?;
    let deleted_str    = cat.deleted_at.map(encode_dt);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE cats SET
             name = ?2, age = ?3, weight = ?4, vaccinated = ?5, sterilized = ?6,
             conditions = ?7, colony_id = ?8, deleted_at = ?9
           WHERE id = ?1",
          rusqlite::params![
            id_val,
            name,
            age,
            weight,
            vaccinated,
            sterilized,
            conditions_str,
            colony_val,
            deleted_str,
          ],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(cat))
  }

  async fn delete_cat_soft(&self, id: CatId) -> Result<Option<Cat>> {
    let id_val = encode_id(id.0)?;
    let at_str = encode_dt(Utc::now());
    let sql = format!("SELECT {CAT_COLUMNS} FROM cats WHERE id = ?1");

    // Stamp and read back in one transaction. Only the first deletion stamps
    // the row.
    let raw: Option<RawCat> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "UPDATE cats SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![id_val, at_str],
        )?;
        let raw = tx
          .query_row(&sql, rusqlite::params![id_val], RawCat::from_row)
          .optional()?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawCat::into_cat).transpose()
  }

  // ── Colonies ──────────────────────────────────────────────────────────────

  async fn list_colonies(&self) -> Result<Vec<Colony>> {
    let sql = format!("SELECT {COLONY_COLUMNS} FROM colonies ORDER BY id");

    let raws: Vec<RawColony> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawColony::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawColony::into_colony).collect()
  }

  async fn get_colony(&self, id: ColonyId) -> Result<Option<Colony>> {
    self.fetch_colony(id).await
  }

  async fn create_colony(&self, input: NewColony) -> Result<Colony> {
    let name        = input.name.clone();
    let phone       = input.phone.clone();
    let description = input.description.clone();
    let latitude    = input.latitude;
    let longitude   = input.longitude;

    let row_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO colonies (name, phone, description, latitude, longitude)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![name, phone, description, latitude, longitude],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(input.into_colony(ColonyId(decode_id(row_id)?)))
  }

  async fn save_colony(&self, colony: Colony) -> Result<Option<Colony>> {
    let id_val      = encode_id(colony.id.0)?;
    let name        = colony.name.clone();
    let phone       = colony.phone.clone();
    let description = colony.description.clone();
    let latitude    = colony.latitude;
    let longitude   = colony.longitude;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE colonies SET
             name = ?2, phone = ?3, description = ?4, latitude = ?5, longitude = ?6
           WHERE id = ?1",
          rusqlite::params![id_val, name, phone, description, latitude, longitude],
        )?)
      })
      .await?;

    Ok((changed > 0).then_some(colony))
  }

  async fn delete_colony_hard(&self, id: ColonyId) -> Result<bool> {
    let id_val = encode_id(id.0)?;

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM colonies WHERE id = ?1", rusqlite::params![id_val])?)
      })
      .await?;

    Ok(removed > 0)
  }
}

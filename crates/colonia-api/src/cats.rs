//! Handlers for `/cats` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/cats` | Active cats, most severe first, with `colonyName` |
//! | `GET`    | `/cats/summary` | Count of active cats per health status |
//! | `POST`   | `/cats` | JSON or form body; returns 201 + classified cat |
//! | `GET`    | `/cats/{id}` | Resolves soft-deleted cats too |
//! | `PUT`    | `/cats/{id}` | Merge update; `PATCH` is accepted as well |
//! | `DELETE` | `/cats/{id}` | Soft delete; returns the stamped record |

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use colonia_core::{
  Registry,
  colony::ColonyId,
  input,
  listing::{ClassifiedCat, HealthSummary},
  store::RecordStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, fields::Fields};

/// Shown in place of a colony name when a cat has no colony or its colony no
/// longer exists.
pub const NO_COLONY: &str = "—";

/// A listing entry with the cat's colony resolved to a display name.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedCat {
  #[serde(flatten)]
  pub entry:       ClassifiedCat,
  pub colony_name: String,
}

fn colony_label(names: &HashMap<ColonyId, String>, id: Option<ColonyId>) -> String {
  id.and_then(|id| names.get(&id))
    .map_or_else(|| NO_COLONY.to_owned(), Clone::clone)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /cats`
pub async fn list<S>(
  State(registry): State<Registry<S>>,
) -> Result<Json<Vec<ListedCat>>, ApiError>
where
  S: RecordStore + 'static,
{
  let listing = registry.list_active().await?;
  let names: HashMap<ColonyId, String> = registry
    .list_colonies()
    .await?
    .into_iter()
    .map(|c| (c.id, c.name))
    .collect();

  let listed = listing
    .into_iter()
    .map(|entry| ListedCat {
      colony_name: colony_label(&names, entry.cat.colony_id),
      entry,
    })
    .collect();
  Ok(Json(listed))
}

/// `GET /cats/summary`
pub async fn summary<S>(
  State(registry): State<Registry<S>>,
) -> Result<Json<HealthSummary>, ApiError>
where
  S: RecordStore + 'static,
{
  let listing = registry.list_active().await?;
  Ok(Json(HealthSummary::tally(&listing)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /cats` — returns 201 + the stored cat with its health status.
pub async fn create<S>(
  State(registry): State<Registry<S>>,
  Fields(fields): Fields,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + 'static,
{
  let entry = registry.create_cat(input::new_cat(&fields)?).await?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /cats/{id}`
pub async fn get_one<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<ClassifiedCat>, ApiError>
where
  S: RecordStore + 'static,
{
  let entry = registry.get_cat(input::cat_id(&raw_id)?).await?;
  Ok(Json(entry))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /cats/{id}` — fields absent from the body keep their stored values.
pub async fn update<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
  Fields(fields): Fields,
) -> Result<Json<ClassifiedCat>, ApiError>
where
  S: RecordStore + 'static,
{
  let id = input::cat_id(&raw_id)?;
  let entry = registry.update_cat(id, input::cat_patch(&fields)?).await?;
  Ok(Json(entry))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /cats/{id}`
pub async fn delete_one<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<ClassifiedCat>, ApiError>
where
  S: RecordStore + 'static,
{
  let entry = registry.delete_cat(input::cat_id(&raw_id)?).await?;
  Ok(Json(entry))
}

//! Handlers for `/colonies` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/colonies` | All colonies in store order |
//! | `POST`   | `/colonies` | JSON or form body; returns 201 |
//! | `GET`    | `/colonies/{id}` | Colony plus its active cats |
//! | `PUT`    | `/colonies/{id}` | Merge update; `PATCH` is accepted as well |
//! | `DELETE` | `/colonies/{id}` | Hard delete; 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use colonia_core::{
  Registry,
  colony::Colony,
  input,
  registry::ColonyDetail,
  store::RecordStore,
};

use crate::{error::ApiError, fields::Fields};

/// `GET /colonies`
pub async fn list<S>(
  State(registry): State<Registry<S>>,
) -> Result<Json<Vec<Colony>>, ApiError>
where
  S: RecordStore + 'static,
{
  Ok(Json(registry.list_colonies().await?))
}

/// `POST /colonies`
pub async fn create<S>(
  State(registry): State<Registry<S>>,
  Fields(fields): Fields,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + 'static,
{
  let colony = registry.create_colony(input::new_colony(&fields)?).await?;
  Ok((StatusCode::CREATED, Json(colony)))
}

/// `GET /colonies/{id}`
pub async fn get_one<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<ColonyDetail>, ApiError>
where
  S: RecordStore + 'static,
{
  let detail = registry.colony_detail(input::colony_id(&raw_id)?).await?;
  Ok(Json(detail))
}

/// `PUT /colonies/{id}`
pub async fn update<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
  Fields(fields): Fields,
) -> Result<Json<Colony>, ApiError>
where
  S: RecordStore + 'static,
{
  let id = input::colony_id(&raw_id)?;
  let colony = registry.update_colony(id, input::colony_patch(&fields)?).await?;
  Ok(Json(colony))
}

/// `DELETE /colonies/{id}` — cats that referenced the colony keep the id.
pub async fn delete_one<S>(
  State(registry): State<Registry<S>>,
  Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore + 'static,
{
  registry.delete_colony(input::colony_id(&raw_id)?).await?;
  Ok(StatusCode::NO_CONTENT)
}

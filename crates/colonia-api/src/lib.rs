//! JSON REST API for Colonia.
//!
//! Exposes an axum [`Router`] backed by a [`Registry`] over any
//! [`RecordStore`]. Transport concerns (listening, tracing, TLS) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(colonia_api::api_router(registry.clone()))
//! ```

pub mod cats;
pub mod colonies;
pub mod error;
pub mod fields;

use axum::{Router, routing::get};
use colonia_core::{Registry, store::RecordStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(registry: Registry<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Cats
    .route("/cats", get(cats::list::<S>).post(cats::create::<S>))
    .route("/cats/summary", get(cats::summary::<S>))
    .route(
      "/cats/{id}",
      get(cats::get_one::<S>)
        .put(cats::update::<S>)
        .patch(cats::update::<S>)
        .delete(cats::delete_one::<S>),
    )
    // Colonies
    .route("/colonies", get(colonies::list::<S>).post(colonies::create::<S>))
    .route(
      "/colonies/{id}",
      get(colonies::get_one::<S>)
        .put(colonies::update::<S>)
        .patch(colonies::update::<S>)
        .delete(colonies::delete_one::<S>),
    )
    .with_state(registry)
}

// ─── Integration tests ────────────────────────────────────────────────────────

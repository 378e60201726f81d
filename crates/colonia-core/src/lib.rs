//! Core types and trait definitions for the Colonia record keeper.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It owns
//! the cat and colony records, the health classifier, the active listing
//! pipeline and the [`Registry`] that orchestrates record lifecycles over any
//! [`store::RecordStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cat;
pub mod colony;
pub mod error;
pub mod health;
pub mod id;
pub mod input;
pub mod listing;
pub mod memory;
pub mod registry;
pub mod store;

pub use error::{Error, RecordKind, Result};
pub use registry::Registry;

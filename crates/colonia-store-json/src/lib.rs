//! Flat-file JSON backend for the Colonia record store.
//!
//! Cats and colonies live in two pretty-printed JSON arrays, `cats.json` and
//! `colonies.json`, inside a data directory. Every call reads the whole file
//! and mutations rewrite it.

mod files;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonStore;

//! Data-driven content definitions and loaders.
//!
//! This crate reads static server content from RON/TOML data files:
//! - Item catalogs (data-driven via RON)
//! - Zone and hazard-device tuning (data-driven via TOML)
//!
//! Content is handed to the runtime at startup and never appears in
//! persisted records.
//!
//! All loaders use game-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, ItemLoader, LoadResult};

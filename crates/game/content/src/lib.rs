//! Data-driven content loaders.
//!
//! This crate turns files on disk into core types:
//! - Level layouts (JSON, versioned)
//! - Game configuration (TOML)
//!
//! Content is consumed when a world is built and never appears in world state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, JsonWorldGenerator, LEVEL_FORMAT_VERSION, LevelFile};

//! Content loaders for reading game data from files.
//!
//! Levels are JSON documents in the world snapshot format; configuration is
//! TOML mapped onto [`drift_core::GameConfig`].

pub mod config;
pub mod factory;
pub mod level;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use level::{JsonWorldGenerator, LEVEL_FORMAT_VERSION, LevelFile};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

//! Content factory for loading everything a session needs from a data directory.

use std::path::{Path, PathBuf};

use drift_core::{GameConfig, World};

use crate::loaders::{ConfigLoader, JsonWorldGenerator, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── levels/
///     ├── demo.json
///     └── gauntlet.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load game configuration from `config.toml`, or defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load `levels/<name>.json` using the given configuration.
    pub fn load_level(&self, name: &str, config: &GameConfig) -> LoadResult<World> {
        let path = self.data_dir.join("levels").join(format!("{name}.json"));
        JsonWorldGenerator::with_config(config).generate(&path)
    }
}

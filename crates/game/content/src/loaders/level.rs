//! JSON level loader.
//!
//! A level file is a world snapshot with a format version:
//!
//! ```json
//! { "version": "1.0", "width": 20, "height": 12,
//!   "entities": [ { "id": "hero", "position": { "x": 1, "y": 1 },
//!                   "components": [ { "type": "vision", "radius": 8 } ],
//!                   "tags": ["player"] } ] }
//! ```

use std::path::Path;

use drift_core::{
    Component, ComponentKind, GameConfig, PLAYER_TAG, SerializedEntity, SerializedWorld, Vision,
    World,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Level format version this loader was written against.
pub const LEVEL_FORMAT_VERSION: &str = "1.0";

/// On-disk level document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(default = "default_version")]
    pub version: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub entities: Vec<SerializedEntity>,
}

fn default_version() -> String {
    LEVEL_FORMAT_VERSION.to_owned()
}

impl From<LevelFile> for SerializedWorld {
    fn from(level: LevelFile) -> Self {
        SerializedWorld {
            width: level.width,
            height: level.height,
            entities: level.entities,
        }
    }
}

/// Builds worlds from JSON level files.
#[derive(Debug, Clone, Default)]
pub struct JsonWorldGenerator {
    default_vision_radius: Option<u32>,
}

impl JsonWorldGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives player entities without a `vision` component the configured radius.
    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            default_vision_radius: Some(config.default_vision_radius),
        }
    }

    /// Load a level from a JSON file.
    pub fn generate(&self, path: &Path) -> LoadResult<World> {
        let content = read_file(path)?;
        self.generate_from_str(&content)
            .map_err(|e| e.context(format!("Failed to load level {}", path.display())))
    }

    pub fn generate_from_str(&self, content: &str) -> LoadResult<World> {
        let level: LevelFile = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level JSON: {}", e))?;
        self.build(level)
    }

    pub fn build(&self, mut level: LevelFile) -> LoadResult<World> {
        if level.version != LEVEL_FORMAT_VERSION {
            tracing::warn!(
                version = %level.version,
                expected = LEVEL_FORMAT_VERSION,
                "unknown level format version, loading anyway"
            );
        }

        if let Some(radius) = self.default_vision_radius {
            for entity in level
                .entities
                .iter_mut()
                .filter(|entity| entity.tags.iter().any(|tag| tag == PLAYER_TAG))
            {
                let has_vision = entity
                    .components
                    .iter()
                    .any(|component| component.kind() == ComponentKind::Vision);
                if !has_vision {
                    entity.components.push(Component::Vision(Vision::new(radius)));
                }
            }
        }

        let entities = level.entities.len();
        let world = World::deserialize(level.into())?;
        tracing::info!(
            width = world.width(),
            height = world.height(),
            entities,
            "level loaded"
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use drift_core::{EntityId, Point, WorldError};

    use super::*;

    const LEVEL: &str = r##"{
        "version": "1.0",
        "width": 6,
        "height": 4,
        "entities": [
            { "id": "hero", "position": { "x": 1, "y": 1 },
              "components": [ { "type": "inertia", "direction": "east", "magnitude": 0 } ],
              "tags": ["player"] },
            { "position": { "x": 3, "y": 1 },
              "components": [ { "type": "opacity" }, { "type": "impassable" } ] },
            { "position": { "x": 2, "y": 0 },
              "components": [ { "type": "wall",
                  "west": { "properties": "RENDER | OPAQUE | IMPASSABLE", "color": "#888" } } ] }
        ]
    }"##;

    #[test]
    fn builds_world_from_json() {
        let world = JsonWorldGenerator::new()
            .generate_from_str(LEVEL)
            .expect("valid level");

        assert_eq!((world.width(), world.height()), (6, 4));
        assert_eq!(world.entity_count(), 3);
        assert!(world.get_entity(&EntityId::new("hero")).is_some());
        assert!(world.fov_map().has_body(Point::new(3, 1)));
        assert!(world.has_wall(Point::new(1, 0), drift_core::Direction::East));
    }

    #[test]
    fn config_supplies_missing_player_vision() {
        let config = GameConfig {
            default_vision_radius: 3,
            ..GameConfig::default()
        };
        let world = JsonWorldGenerator::with_config(&config)
            .generate_from_str(LEVEL)
            .expect("valid level");

        let hero = world.get_player().expect("one player");
        assert_eq!(hero.vision().map(|v| v.radius), Some(3));
        assert!(world.is_location_visible(Point::new(1, 1)));
    }

    #[test]
    fn unknown_version_still_loads() {
        let world = JsonWorldGenerator::new()
            .generate_from_str(r#"{"version":"9.9","width":2,"height":2,"entities":[]}"#)
            .expect("forward compatible");
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn corrupt_levels_are_errors() {
        let generator = JsonWorldGenerator::new();
        assert!(generator.generate_from_str("{ not json").is_err());
        assert!(
            generator
                .generate_from_str(r#"{"width":3,"height":3,"entities":[{"components":[]}]}"#)
                .is_err()
        );

        let err = generator
            .generate_from_str(r#"{"width":0,"height":3}"#)
            .expect_err("zero width");
        assert_eq!(
            err.downcast_ref::<WorldError>(),
            Some(&WorldError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn generate_reads_file_and_names_it_in_errors() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(LEVEL.as_bytes()).expect("write level");
        let world = JsonWorldGenerator::new()
            .generate(file.path())
            .expect("load level");
        assert_eq!(world.entity_count(), 3);

        let missing = file.path().with_extension("missing");
        let err = JsonWorldGenerator::new()
            .generate(&missing)
            .expect_err("missing file");
        assert!(err.to_string().contains("Failed to read file"));
    }
}

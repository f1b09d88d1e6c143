//! Plain-data snapshots of a world.
use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::entity::{Entity, EntityId};
use crate::error::WorldError;
use crate::geometry::Point;

use super::World;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedWorld {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub entities: Vec<SerializedEntity>,
}

/// One entity as stored in snapshots and level files.
///
/// A missing `id` gets a generated one on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub position: Point,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl SerializedEntity {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: Some(entity.id().clone()),
            position: entity.position(),
            components: entity.components().iter().cloned().collect(),
            tags: entity.tags().map(str::to_owned).collect(),
        }
    }

    pub fn into_entity(self) -> Entity {
        let id = self.id.unwrap_or_else(EntityId::generate);
        let entity = self
            .components
            .into_iter()
            .fold(Entity::with_id(id, self.position), Entity::with_component);
        self.tags.into_iter().fold(entity, Entity::with_tag)
    }
}

impl World {
    pub fn serialize(&self) -> SerializedWorld {
        SerializedWorld {
            width: self.width,
            height: self.height,
            entities: self.entities().map(SerializedEntity::from_entity).collect(),
        }
    }

    /// Rebuilds a world from a snapshot.
    ///
    /// Entities are loaded in bulk mode followed by a single FOV rebuild.
    /// Entities outside the grid are dropped the same way
    /// [`add_entity`](Self::add_entity) drops them.
    pub fn deserialize(data: SerializedWorld) -> Result<World, WorldError> {
        if data.width == 0 || data.height == 0 {
            return Err(WorldError::InvalidDimensions {
                width: data.width,
                height: data.height,
            });
        }

        // Stored ids are claimed before any missing one is generated.
        for id in data.entities.iter().filter_map(|entity| entity.id.as_ref()) {
            id.reserve();
        }

        let mut world = World::new(data.width, data.height);
        world.unready();
        let total = data.entities.len();
        let mut loaded = 0;
        for mut entity in data.entities {
            if entity.id.is_none() {
                entity.id = Some(world.fresh_id());
            }
            if world.add_entity(entity.into_entity()) {
                loaded += 1;
            }
        }
        world.ready();

        if loaded != total {
            tracing::warn!(loaded, total, "dropped out-of-bounds entities while loading world");
        }
        Ok(world)
    }
}

use drift_core::{EntityId, World};

use crate::action::ActionTransition;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoveEntityError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("entity {0} is still registered after removal")]
    StillPresent(EntityId),
}

/// Takes an entity out of the world, e.g. an enemy that reached the player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveEntityAction {
    pub entity: EntityId,
}

impl RemoveEntityAction {
    pub fn new(entity: EntityId) -> Self {
        Self { entity }
    }
}

impl ActionTransition for RemoveEntityAction {
    type Error = RemoveEntityError;

    fn actor(&self) -> &EntityId {
        &self.entity
    }

    fn pre_validate(&self, world: &World) -> Result<(), Self::Error> {
        world
            .get_entity(&self.entity)
            .map(|_| ())
            .ok_or_else(|| RemoveEntityError::EntityNotFound(self.entity.clone()))
    }

    fn apply(&self, world: &mut World) -> Result<(), Self::Error> {
        world
            .remove_entity(&self.entity)
            .map(|_| ())
            .ok_or_else(|| RemoveEntityError::EntityNotFound(self.entity.clone()))
    }

    fn post_validate(&self, world: &World) -> Result<(), Self::Error> {
        match world.get_entity(&self.entity) {
            Some(_) => Err(RemoveEntityError::StillPresent(self.entity.clone())),
            None => Ok(()),
        }
    }
}

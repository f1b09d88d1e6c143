use drift_core::{Component, ComponentKind, EntityId, World};

use crate::action::ActionTransition;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CooldownError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("entity {0} has no cooldown component")]
    MissingComponent(EntityId),

    #[error("entity {entity} has no cooldown named {name:?}")]
    UnknownCooldown { entity: EntityId, name: String },
}

/// Restarts one named cooldown of an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCooldownAction {
    pub entity: EntityId,
    pub name: String,
}

impl TriggerCooldownAction {
    pub fn new(entity: EntityId, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
        }
    }
}

impl ActionTransition for TriggerCooldownAction {
    type Error = CooldownError;

    fn actor(&self) -> &EntityId {
        &self.entity
    }

    fn pre_validate(&self, world: &World) -> Result<(), Self::Error> {
        let entity = world
            .get_entity(&self.entity)
            .ok_or_else(|| CooldownError::EntityNotFound(self.entity.clone()))?;
        let cooldown = entity
            .cooldown()
            .ok_or_else(|| CooldownError::MissingComponent(self.entity.clone()))?;

        if cooldown.get(&self.name).is_none() {
            return Err(CooldownError::UnknownCooldown {
                entity: self.entity.clone(),
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    fn apply(&self, world: &mut World) -> Result<(), Self::Error> {
        let changed = world.modify_component(&self.entity, ComponentKind::Cooldown, |component| {
            if let Component::Cooldown(cooldown) = component {
                if let Some(state) = cooldown.get_mut(&self.name) {
                    state.trigger();
                }
            }
        });

        if changed {
            Ok(())
        } else {
            Err(CooldownError::MissingComponent(self.entity.clone()))
        }
    }
}

use drift_core::{EntityId, PassOptions, Point, World};

use crate::action::ActionTransition;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("destination {destination} is out of bounds")]
    OutOfBounds { destination: Point },

    #[error("step from {from} to {to} is blocked")]
    Blocked { from: Point, to: Point },

    #[error("entity {entity} ended at {actual} instead of {expected}")]
    PositionDesync {
        entity: EntityId,
        expected: Point,
        actual: Point,
    },
}

/// Moves an entity onto `to`.
///
/// Regular moves must be a single passable step. Forced moves skip the
/// passability check and only require an in-bounds destination; followers
/// use them to take over the tile their leader left.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub entity: EntityId,
    pub to: Point,
    #[cfg_attr(feature = "serde", serde(default))]
    pub force: bool,
}

impl MoveAction {
    pub fn new(entity: EntityId, to: Point) -> Self {
        Self {
            entity,
            to,
            force: false,
        }
    }

    pub fn forced(entity: EntityId, to: Point) -> Self {
        Self {
            entity,
            to,
            force: true,
        }
    }
}

impl ActionTransition for MoveAction {
    type Error = MoveError;

    fn actor(&self) -> &EntityId {
        &self.entity
    }

    fn pre_validate(&self, world: &World) -> Result<(), Self::Error> {
        let entity = world
            .get_entity(&self.entity)
            .ok_or_else(|| MoveError::EntityNotFound(self.entity.clone()))?;

        if !world.is_in_bounds(self.to) {
            return Err(MoveError::OutOfBounds {
                destination: self.to,
            });
        }

        let from = entity.position();
        if !self.force && !world.is_passable(from, self.to, PassOptions::MOVEMENT) {
            return Err(MoveError::Blocked { from, to: self.to });
        }

        Ok(())
    }

    fn apply(&self, world: &mut World) -> Result<(), Self::Error> {
        if world.move_entity(&self.entity, self.to) {
            Ok(())
        } else {
            Err(MoveError::EntityNotFound(self.entity.clone()))
        }
    }

    fn post_validate(&self, world: &World) -> Result<(), Self::Error> {
        let actual = world
            .get_entity(&self.entity)
            .ok_or_else(|| MoveError::EntityNotFound(self.entity.clone()))?
            .position();

        if actual == self.to {
            Ok(())
        } else {
            Err(MoveError::PositionDesync {
                entity: self.entity.clone(),
                expected: self.to,
                actual,
            })
        }
    }
}

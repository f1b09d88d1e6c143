//! Validated world mutations requested by systems.
//!
//! Systems never call [`World::move_entity`] and friends directly. They build
//! an [`Action`] and hand it to the [`ActionHandler`], which runs the
//! transition pipeline: pre-validate, apply, post-validate.
pub mod cooldown;
pub mod handler;
pub mod movement;
pub mod remove;

pub use cooldown::{CooldownError, TriggerCooldownAction};
pub use handler::{ActionHandler, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use movement::{MoveAction, MoveError};
pub use remove::{RemoveEntityAction, RemoveEntityError};

use drift_core::{EntityId, World};

/// Defines how a concrete action variant mutates the world.
///
/// Validation hooks receive read-only access and must stay side-effect free.
pub trait ActionTransition {
    type Error;

    /// Returns the entity the action is about.
    fn actor(&self) -> &EntityId;

    /// Validates pre-conditions using the world **before** mutation.
    fn pre_validate(&self, _world: &World) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action. Implementations may assume `pre_validate` passed.
    fn apply(&self, world: &mut World) -> Result<(), Self::Error>;

    /// Validates post-conditions using the world **after** mutation.
    fn post_validate(&self, _world: &World) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Action type tag used for logging and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionKind {
    Move,
    RemoveEntity,
    TriggerCooldown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Action {
    Move(MoveAction),
    RemoveEntity(RemoveEntityAction),
    TriggerCooldown(TriggerCooldownAction),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move(_) => ActionKind::Move,
            Action::RemoveEntity(_) => ActionKind::RemoveEntity,
            Action::TriggerCooldown(_) => ActionKind::TriggerCooldown,
        }
    }

    pub fn actor(&self) -> &EntityId {
        match self {
            Action::Move(action) => action.actor(),
            Action::RemoveEntity(action) => action.actor(),
            Action::TriggerCooldown(action) => action.actor(),
        }
    }
}

impl From<MoveAction> for Action {
    fn from(action: MoveAction) -> Self {
        Action::Move(action)
    }
}

impl From<RemoveEntityAction> for Action {
    fn from(action: RemoveEntityAction) -> Self {
        Action::RemoveEntity(action)
    }
}

impl From<TriggerCooldownAction> for Action {
    fn from(action: TriggerCooldownAction) -> Self {
        Action::TriggerCooldown(action)
    }
}

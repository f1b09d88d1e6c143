//! Action dispatch and the transition pipeline.
//!
//! [`ActionHandler`] is the single entry point through which systems mutate
//! the world. Every action runs pre_validate → apply → post_validate, and a
//! failure is reported together with the phase that produced it.

use drift_core::World;

use crate::action::{
    Action, ActionTransition, MoveAction, RemoveEntityAction, TriggerCooldownAction,
};

/// Pipeline stage that rejected an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{phase} failed: {error}")]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

/// Errors surfaced while executing an action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<<MoveAction as ActionTransition>::Error>),

    #[error("remove entity action failed: {0}")]
    RemoveEntity(TransitionPhaseError<<RemoveEntityAction as ActionTransition>::Error>),

    #[error("trigger cooldown action failed: {0}")]
    TriggerCooldown(TransitionPhaseError<<TriggerCooldownAction as ActionTransition>::Error>),
}

impl ExecuteError {
    pub fn phase(&self) -> TransitionPhase {
        match self {
            ExecuteError::Move(err) => err.phase,
            ExecuteError::RemoveEntity(err) => err.phase,
            ExecuteError::TriggerCooldown(err) => err.phase,
        }
    }
}

type TransitionResult<E> = Result<(), TransitionPhaseError<E>>;

macro_rules! dispatch_transition {
    ($action:expr, $world:expr, { $($variant:ident),+ $(,)? }) => {{
        match $action {
            $(
                Action::$variant(transition) => {
                    drive_transition(transition, $world).map_err(ExecuteError::$variant)
                }
            )+
        }
    }};
}

/// Routes actions through their transition pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionHandler;

impl ActionHandler {
    pub fn new() -> Self {
        Self
    }

    /// Whether `action` would pass pre-validation against the current world.
    pub fn can_execute(&self, world: &World, action: &Action) -> bool {
        match action {
            Action::Move(transition) => transition.pre_validate(world).is_ok(),
            Action::RemoveEntity(transition) => transition.pre_validate(world).is_ok(),
            Action::TriggerCooldown(transition) => transition.pre_validate(world).is_ok(),
        }
    }

    /// Executes an action through the full pipeline.
    pub fn execute(&self, world: &mut World, action: &Action) -> Result<(), ExecuteError> {
        let result = dispatch_transition!(action, world, {
            Move,
            RemoveEntity,
            TriggerCooldown,
        });

        match &result {
            Ok(()) => tracing::trace!(kind = %action.kind(), actor = %action.actor(), "action executed"),
            Err(err) => tracing::debug!(kind = %action.kind(), actor = %action.actor(), %err, "action rejected"),
        }
        result
    }
}

#[inline]
fn drive_transition<T>(transition: &T, world: &mut World) -> TransitionResult<T::Error>
where
    T: ActionTransition,
{
    transition
        .pre_validate(world)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(world)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(world)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

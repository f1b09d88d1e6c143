//! Runtime for the drift simulation.
//!
//! The runtime owns a [`World`](drift_core::World) and advances it in ticks.
//! Systems decide what should happen and request every mutation through the
//! [`ActionHandler`], which validates and applies it.
//!
//! Modules are organized by responsibility:
//! - [`action`] defines validated world mutations and their dispatch
//! - [`systems`] holds the per-tick behaviours
//! - [`simulation`] runs the systems in order inside one event batch
//! - [`config`] reads session settings from the environment
pub mod action;
pub mod config;
pub mod simulation;
pub mod systems;

pub use action::{
    Action, ActionHandler, ActionKind, ActionTransition, CooldownError, ExecuteError, MoveAction,
    MoveError, RemoveEntityAction, RemoveEntityError, TransitionPhase, TransitionPhaseError,
    TriggerCooldownAction,
};
pub use config::RuntimeConfig;
pub use simulation::Simulation;
pub use systems::{
    CooldownSystem, EnemyAiSystem, FollowingSystem, PlayerMovementSystem, System,
};

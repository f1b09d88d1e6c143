//! Deterministic world model and movement rules for drift.
//!
//! `drift-core` owns the canonical game state: the [`world::World`] registry
//! with its spatial, component and field-of-view indices, and the
//! [`movement::MovementPredictor`] that plans inertia-based moves. Everything
//! here is synchronous and single-threaded; the runtime drives it tick by
//! tick and the content crate feeds it levels.
pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod fov;
pub mod geometry;
pub mod movement;
pub mod world;

pub use component::{
    BufferedMove, Component, ComponentKind, Cooldown, CooldownState, EnemyAi, EnemyAiKind,
    Follower, Inertia, Metrics, Symbol, Vision, Wall, WallEdge, WallProperties, WallSegment,
};
pub use config::{GameConfig, MovementConfig};
pub use entity::{ComponentStore, Entity, EntityId, PLAYER_TAG};
pub use error::WorldError;
pub use fov::{FieldOfView, FieldOfViewMap, compute_field_of_view};
pub use geometry::{Direction, Point};
pub use movement::{MovementPrediction, MovementPredictor, MoverState, PlannedMove};
#[cfg(feature = "serde")]
pub use world::{SerializedEntity, SerializedWorld};
pub use world::{
    EventBus, Followups, HandlerId, Heuristic, PassOptions, PassabilityOracle, World, WorldEvent,
    WorldEventKind,
};

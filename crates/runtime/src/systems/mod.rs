//! Per-tick game systems.
//!
//! Each system reads the world, decides what should happen and requests it
//! through the [`ActionHandler`]. Entity ids are collected before anything is
//! mutated so a system never iterates an index it is changing.
pub mod cooldown;
pub mod enemy_ai;
pub mod following;
pub mod player_movement;

pub use cooldown::CooldownSystem;
pub use enemy_ai::EnemyAiSystem;
pub use following::FollowingSystem;
pub use player_movement::PlayerMovementSystem;

use drift_core::{ComponentKind, EntityId, World};

use crate::action::ActionHandler;

/// A unit of per-tick behaviour driven by the simulation loop.
pub trait System {
    fn name(&self) -> &'static str;

    fn tick(&mut self, world: &mut World, handler: &ActionHandler);
}

/// Ids of every entity carrying `kind`, collected up front.
pub(crate) fn snapshot_ids(world: &World, kind: ComponentKind) -> Vec<EntityId> {
    world
        .get_entities_with_component(kind)
        .into_iter()
        .map(|entity| entity.id().clone())
        .collect()
}

use drift_core::{Component, ComponentKind, EntityId, Point, World};

use crate::action::{Action, ActionHandler, MoveAction};
use crate::systems::{System, snapshot_ids};

/// Keeps followers one step behind their leader.
///
/// Each tick a follower whose leader has moved steps onto the tile the
/// leader left, then remembers where the leader is now. The step is forced:
/// the leader just stood there, so the tile was reachable.
#[derive(Debug, Default)]
pub struct FollowingSystem;

impl FollowingSystem {
    fn follow(world: &mut World, handler: &ActionHandler, id: &EntityId) {
        let Some((leader, last_seen, position)) = world.get_entity(id).and_then(|entity| {
            entity
                .follower()
                .map(|f| (f.leader.clone(), f.last_leader_position, entity.position()))
        }) else {
            return;
        };

        let Some(leader_position) = world.get_entity(&leader).map(|entity| entity.position())
        else {
            tracing::trace!(follower = %id, %leader, "leader gone");
            return;
        };

        if last_seen == Some(leader_position) {
            return;
        }

        match last_seen {
            Some(previous) if previous != position => {
                let action = Action::from(MoveAction::forced(id.clone(), previous));
                if let Err(err) = handler.execute(world, &action) {
                    tracing::debug!(follower = %id, %err, "follow step rejected");
                }
            }
            _ => {}
        }

        Self::remember(world, id, leader_position);
    }

    fn remember(world: &mut World, id: &EntityId, leader_position: Point) {
        world.modify_component(id, ComponentKind::Follower, |component| {
            if let Component::Follower(follower) = component {
                follower.last_leader_position = Some(leader_position);
            }
        });
    }
}

impl System for FollowingSystem {
    fn name(&self) -> &'static str {
        "following"
    }

    fn tick(&mut self, world: &mut World, handler: &ActionHandler) {
        for id in snapshot_ids(world, ComponentKind::Follower) {
            Self::follow(world, handler, &id);
        }
    }
}

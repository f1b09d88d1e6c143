use drift_core::{
    ComponentKind, EnemyAiKind, Entity, EntityId, Point, World, compute_field_of_view,
};

use crate::action::{Action, ActionHandler, MoveAction, TriggerCooldownAction};
use crate::systems::{System, snapshot_ids};

/// Cooldown name that paces enemy steps.
pub const MOVE_COOLDOWN: &str = "move";

/// Moves chasers one tile along a path towards the player once they can see it.
#[derive(Debug, Default)]
pub struct EnemyAiSystem;

impl EnemyAiSystem {
    /// Chasers aggro on a player inside their radius and line of sight.
    /// Enemies with their own vision use it; the rest look as far as the
    /// aggro radius reaches.
    fn notices(world: &World, enemy: &Entity, player: &Entity, aggro_radius: u32) -> bool {
        if enemy.position().chebyshev(player.position()) > aggro_radius {
            return false;
        }
        if enemy.vision().is_some() {
            return world.can_entity_see_entity(enemy.id(), player.id());
        }
        let origin = enemy.position();
        compute_field_of_view(world.fov_map(), origin.x, origin.y, aggro_radius)
            .is_visible(player.position())
    }

    fn next_step(world: &World, id: &EntityId, target: Point) -> Option<Point> {
        let enemy = world.get_entity(id)?;
        let ai = enemy.enemy_ai()?;
        if ai.kind == EnemyAiKind::Stationary {
            return None;
        }
        if !enemy
            .cooldown()
            .is_none_or(|cooldown| cooldown.is_ready(MOVE_COOLDOWN))
        {
            return None;
        }
        let player = world.get_player().ok()?;
        if !Self::notices(world, enemy, player, ai.aggro_radius) {
            return None;
        }

        let path = world.find_path(enemy.position(), target, false)?;
        // The last tile is the player itself; stop next to it.
        if path.len() <= 2 {
            return None;
        }
        path.get(1).copied()
    }
}

impl System for EnemyAiSystem {
    fn name(&self) -> &'static str {
        "enemy_ai"
    }

    fn tick(&mut self, world: &mut World, handler: &ActionHandler) {
        let target = match world.get_player() {
            Ok(player) => player.position(),
            Err(err) => {
                tracing::trace!(%err, "enemy ai idle");
                return;
            }
        };

        for id in snapshot_ids(world, ComponentKind::EnemyAi) {
            let Some(step) = Self::next_step(world, &id, target) else {
                continue;
            };

            let action = Action::from(MoveAction::new(id.clone(), step));
            if let Err(err) = handler.execute(world, &action) {
                tracing::debug!(enemy = %id, %err, "chase step rejected");
                continue;
            }

            let paced = world
                .get_entity(&id)
                .and_then(|enemy| enemy.cooldown())
                .is_some_and(|cooldown| cooldown.get(MOVE_COOLDOWN).is_some());
            if paced {
                let trigger = Action::from(TriggerCooldownAction::new(id.clone(), MOVE_COOLDOWN));
                if let Err(err) = handler.execute(world, &trigger) {
                    tracing::warn!(enemy = %id, %err, "failed to restart move cooldown");
                }
            }
        }
    }
}

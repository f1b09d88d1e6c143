use std::collections::BTreeSet;

use drift_core::{
    Component, ComponentKind, EntityId, MovementConfig, MovementPrediction, MovementPredictor,
    World,
};

use crate::action::{Action, ActionHandler, MoveAction};
use crate::systems::{System, snapshot_ids};

/// Applies inertia-based movement to every entity that has momentum or a
/// buffered input.
#[derive(Debug, Default)]
pub struct PlayerMovementSystem {
    predictor: MovementPredictor,
}

impl PlayerMovementSystem {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            predictor: MovementPredictor::new(config),
        }
    }

    fn movers(world: &World) -> BTreeSet<EntityId> {
        let mut ids: BTreeSet<EntityId> = snapshot_ids(world, ComponentKind::Inertia)
            .into_iter()
            .collect();
        ids.extend(snapshot_ids(world, ComponentKind::BufferedMove));
        ids
    }

    fn apply(
        &self,
        world: &mut World,
        handler: &ActionHandler,
        id: &EntityId,
        prediction: &MovementPrediction,
    ) {
        let mut hops = 0u32;
        for hop in &prediction.actions {
            let action = Action::from(MoveAction::new(id.clone(), hop.to));
            if let Err(err) = handler.execute(world, &action) {
                tracing::debug!(entity = %id, %err, "planned hop rejected");
                break;
            }
            hops += 1;
        }

        let current = world.get_entity(id).and_then(|entity| entity.inertia().copied());
        if current != Some(prediction.final_inertia) {
            world.add_component(id, prediction.final_inertia);
        }
        if world
            .get_entity(id)
            .is_some_and(|entity| entity.has_component(ComponentKind::BufferedMove))
        {
            world.remove_component(id, ComponentKind::BufferedMove);
        }

        let drifted = u32::from(prediction.drifted && hops > 0);
        let collided = u32::from(prediction.will_collide);
        if hops > 0 || collided > 0 {
            world.modify_component(id, ComponentKind::Metrics, |component| {
                if let Component::Metrics(metrics) = component {
                    metrics.tiles_traveled += hops;
                    metrics.drift_distance += drifted;
                    metrics.collisions += collided;
                }
            });
        }

        if prediction.will_collide {
            tracing::debug!(entity = %id, at = ?prediction.collision, "mover collided");
        }
    }
}

impl System for PlayerMovementSystem {
    fn name(&self) -> &'static str {
        "player_movement"
    }

    fn tick(&mut self, world: &mut World, handler: &ActionHandler) {
        for id in Self::movers(world) {
            let Some(prediction) = self.predictor.predict_move(world, &id) else {
                continue;
            };
            self.apply(world, handler, &id, &prediction);
        }
    }
}

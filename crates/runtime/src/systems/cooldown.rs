use drift_core::{Component, ComponentKind, World};

use crate::action::ActionHandler;
use crate::systems::{System, snapshot_ids};

/// Counts every named cooldown down by one tick.
#[derive(Debug, Default)]
pub struct CooldownSystem;

impl System for CooldownSystem {
    fn name(&self) -> &'static str {
        "cooldown"
    }

    fn tick(&mut self, world: &mut World, _handler: &ActionHandler) {
        for id in snapshot_ids(world, ComponentKind::Cooldown) {
            let running = world
                .get_entity(&id)
                .and_then(|entity| entity.cooldown())
                .is_some_and(|cooldown| cooldown.cooldowns.values().any(|state| !state.ready));
            if !running {
                continue;
            }

            world.modify_component(&id, ComponentKind::Cooldown, |component| {
                if let Component::Cooldown(cooldown) = component {
                    cooldown.tick_all();
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use drift_core::{Cooldown, Entity, Point};

    use super::*;

    #[test]
    fn triggered_cooldowns_become_ready_after_base_ticks() {
        let mut world = World::new(2, 2);
        let mut cooldown = Cooldown::default().with("move", 2);
        if let Some(state) = cooldown.get_mut("move") {
            state.trigger();
        }
        world.add_entity(Entity::with_id("grunt".into(), Point::ORIGIN).with_component(cooldown));

        let mut system = CooldownSystem;
        let handler = ActionHandler::new();
        let ready = |world: &World| {
            world
                .get_entity(&"grunt".into())
                .and_then(|e| e.cooldown())
                .is_some_and(|c| c.is_ready("move"))
        };

        assert!(!ready(&world));
        system.tick(&mut world, &handler);
        assert!(!ready(&world));
        system.tick(&mut world, &handler);
        assert!(ready(&world));
    }
}

//! Tick loop over a world and its systems.
use drift_core::{
    BufferedMove, Component, ComponentKind, Direction, EntityId, GameConfig, World, WorldError,
};

use crate::action::ActionHandler;
use crate::systems::{
    CooldownSystem, EnemyAiSystem, FollowingSystem, PlayerMovementSystem, System,
};

/// Owns a world and advances it one tick at a time.
///
/// Systems run in registration order inside a single event batch, so
/// listeners observe a tick's events only after every system has finished.
pub struct Simulation {
    world: World,
    handler: ActionHandler,
    systems: Vec<Box<dyn System>>,
    tick: u64,
}

impl Simulation {
    /// Creates a simulation with the default system order: cooldowns,
    /// enemy AI, player movement, following.
    pub fn from_world(world: World, config: &GameConfig) -> Self {
        Self::with_systems(
            world,
            vec![
                Box::new(CooldownSystem),
                Box::new(EnemyAiSystem),
                Box::new(PlayerMovementSystem::new(config.movement)),
                Box::new(FollowingSystem),
            ],
        )
    }

    pub fn with_systems(world: World, systems: Vec<Box<dyn System>>) -> Self {
        Self {
            world,
            handler: ActionHandler::new(),
            systems,
            tick: 0,
        }
    }

    pub fn add_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    pub fn handler(&self) -> &ActionHandler {
        &self.handler
    }

    /// Number of ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn system_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|system| system.name())
    }

    /// Queues a directional input for the player's next movement tick.
    /// A later input in the same tick replaces the earlier one.
    pub fn buffer_input(&mut self, direction: Direction, key_up: bool) -> Result<(), WorldError> {
        let id = self.player_id()?;
        self.world.add_component(
            &id,
            BufferedMove {
                direction,
                key_up,
            },
        );
        Ok(())
    }

    pub fn set_brake(&mut self, engaged: bool) -> Result<(), WorldError> {
        self.toggle(ComponentKind::Brake, Component::Brake, engaged)
    }

    pub fn set_turbo(&mut self, engaged: bool) -> Result<(), WorldError> {
        self.toggle(ComponentKind::Turbo, Component::Turbo, engaged)
    }

    /// Runs every system once and returns the number of the tick just run.
    pub fn tick(&mut self) -> u64 {
        self.world.start_batch();
        for system in &mut self.systems {
            tracing::trace!(system = system.name(), tick = self.tick + 1, "running system");
            system.tick(&mut self.world, &self.handler);
        }
        self.world.end_batch();

        self.tick += 1;
        self.tick
    }

    fn player_id(&self) -> Result<EntityId, WorldError> {
        self.world.get_player().map(|player| player.id().clone())
    }

    fn toggle(
        &mut self,
        kind: ComponentKind,
        marker: Component,
        engaged: bool,
    ) -> Result<(), WorldError> {
        let id = self.player_id()?;
        let present = self
            .world
            .get_entity(&id)
            .is_some_and(|player| player.has_component(kind));
        if engaged && !present {
            self.world.add_component(&id, marker);
        } else if !engaged && present {
            self.world.remove_component(&id, kind);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("systems", &self.system_names().collect::<Vec<_>>())
            .field("tick", &self.tick)
            .finish()
    }
}

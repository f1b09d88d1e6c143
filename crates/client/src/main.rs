//! Drift command-line driver.
//!
//! Loads a level, runs the simulation for a number of ticks and prints the
//! final map. Settings come from the environment (a `.env` file is read if
//! present):
//!
//! - `DRIFT_DATA_DIR`: content directory (default `data`)
//! - `DRIFT_LEVEL`: level name under `levels/` (default `demo`)
//! - `DRIFT_CONFIG`: explicit `config.toml` path
//! - `DRIFT_TICKS`: ticks to run (default 20)
//! - `DRIFT_INPUTS`: player input script, see [`script`]
//! - `RUST_LOG`: log filter
mod render;
mod script;

use std::env;

use anyhow::{Context, Result};
use drift_content::{ConfigLoader, ContentFactory};
use drift_core::{WorldEvent, WorldEventKind};
use drift_runtime::{RuntimeConfig, Simulation};
use tracing_subscriber::EnvFilter;

use crate::script::InputScript;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    let inputs = match env::var("DRIFT_INPUTS") {
        Ok(script) => InputScript::parse(&script).context("invalid DRIFT_INPUTS")?,
        Err(_) => InputScript::default(),
    };

    tracing::info!(
        data_dir = %config.data_dir.display(),
        level = %config.level,
        ticks = config.ticks,
        inputs = inputs.len(),
        "starting drift"
    );

    let factory = ContentFactory::new(&config.data_dir);
    let game_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => factory.load_config()?,
    };
    let world = factory
        .load_level(&config.level, &game_config)
        .with_context(|| format!("failed to load level '{}'", config.level))?;

    let mut simulation = Simulation::from_world(world, &game_config);
    subscribe_logging(&mut simulation);

    for _ in 0..config.ticks {
        inputs.apply(&mut simulation)?;
        let tick = simulation.tick();
        tracing::debug!(tick, "tick complete");
    }

    if let Ok(player) = simulation.world().get_player() {
        let metrics = player.metrics().copied().unwrap_or_default();
        tracing::info!(
            position = %player.position(),
            tiles_traveled = metrics.tiles_traveled,
            drift_distance = metrics.drift_distance,
            collisions = metrics.collisions,
            "run finished"
        );
    }

    print!("{}", render::render(simulation.world()));
    Ok(())
}

fn subscribe_logging(simulation: &mut Simulation) {
    let world = simulation.world_mut();
    world.on(WorldEventKind::EntityMoved, |event, _| {
        if let WorldEvent::EntityMoved { entity, from, to } = event {
            tracing::debug!(%entity, %from, %to, "entity moved");
        }
    });
    world.on(WorldEventKind::EntityRemoved, |event, _| {
        if let WorldEvent::EntityRemoved { entity, position } = event {
            tracing::info!(entity = %entity.id(), %position, "entity removed");
        }
    });
}

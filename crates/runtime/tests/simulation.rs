use std::cell::RefCell;
use std::rc::Rc;

use drift_content::JsonWorldGenerator;
use drift_core::{Direction, Entity, EntityId, GameConfig, Point, WorldEvent, WorldEventKind};
use drift_runtime::Simulation;

const LEVEL: &str = r#"{
    "version": "1.0",
    "width": 12,
    "height": 5,
    "entities": [
        { "id": "hero", "position": { "x": 1, "y": 2 }, "tags": ["player"],
          "components": [
              { "type": "inertia", "direction": "east", "magnitude": 0 },
              { "type": "metrics" } ] },
        { "id": "pet", "position": { "x": 0, "y": 2 },
          "components": [ { "type": "follower", "leader": "hero" } ] },
        { "id": "grunt", "position": { "x": 10, "y": 2 },
          "components": [
              { "type": "enemy_ai", "kind": "chaser", "aggro_radius": 8 },
              { "type": "cooldown", "cooldowns": {
                  "move": { "base": 1, "current": 0, "ready": true } } } ] }
    ]
}"#;

fn simulation() -> Simulation {
    let config = GameConfig::default();
    let world = JsonWorldGenerator::with_config(&config)
        .generate_from_str(LEVEL)
        .expect("valid level");
    Simulation::from_world(world, &config)
}

fn position(sim: &Simulation, id: &str) -> Point {
    sim.world()
        .get_entity(&EntityId::new(id))
        .map(Entity::position)
        .expect("entity exists")
}

#[test]
fn a_short_run_moves_everyone() {
    let mut sim = simulation();
    for _ in 0..3 {
        sim.buffer_input(Direction::East, false).expect("player");
        sim.tick();
    }

    assert_eq!(position(&sim, "hero"), Point::new(4, 2));
    // The follower records the leader on the first tick, then trails it.
    assert_eq!(position(&sim, "pet"), Point::new(3, 2));
    // Out of range on tick one, then one step per tick.
    assert_eq!(position(&sim, "grunt"), Point::new(8, 2));

    let hero = sim.world().get_player().expect("player");
    assert_eq!(hero.metrics().map(|m| m.tiles_traveled), Some(3));
    assert_eq!(hero.inertia().map(|i| i.magnitude), Some(3));
}

#[test]
fn drifting_turn_is_recorded_in_metrics() {
    let mut sim = simulation();
    for _ in 0..4 {
        sim.buffer_input(Direction::East, false).expect("player");
        sim.tick();
    }
    assert_eq!(position(&sim, "hero"), Point::new(5, 2));

    sim.buffer_input(Direction::North, false).expect("player");
    sim.tick();

    let hero = sim.world().get_player().expect("player");
    assert_eq!(hero.position(), Point::new(6, 1));
    let metrics = hero.metrics().copied().expect("metrics");
    assert_eq!(metrics.tiles_traveled, 6);
    assert_eq!(metrics.drift_distance, 1);
    assert_eq!(
        hero.inertia().map(|i| (i.direction, i.magnitude)),
        Some((Direction::North, 3))
    );
}

#[test]
fn tick_events_arrive_after_the_tick() {
    let mut sim = simulation();
    let moves = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&moves);
    sim.world_mut()
        .on(WorldEventKind::EntityMoved, move |event, _| {
            if let WorldEvent::EntityMoved { entity, .. } = event {
                sink.borrow_mut().push(entity.clone());
            }
        });

    sim.buffer_input(Direction::East, false).expect("player");
    sim.tick();
    assert_eq!(*moves.borrow(), vec![EntityId::new("hero")]);

    moves.borrow_mut().clear();
    sim.buffer_input(Direction::East, false).expect("player");
    sim.tick();
    assert_eq!(
        *moves.borrow(),
        vec![
            EntityId::new("grunt"),
            EntityId::new("hero"),
            EntityId::new("pet")
        ]
    );
}

#[test]
fn collisions_with_level_geometry_stop_the_player() {
    let mut sim = simulation();
    sim.world_mut().set_wall(
        Point::new(2, 2),
        Direction::East,
        drift_core::WallProperties::SOLID,
        "#fff",
    );

    for _ in 0..3 {
        sim.buffer_input(Direction::East, false).expect("player");
        sim.tick();
    }

    let hero = sim.world().get_player().expect("player");
    assert_eq!(hero.position(), Point::new(2, 2));
    assert_eq!(hero.metrics().map(|m| m.collisions), Some(2));
}

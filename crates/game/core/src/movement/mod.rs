//! Inertia-based movement planning.
//!
//! [`MovementPredictor`] turns a mover's input and momentum into at most two
//! single-tile hops plus the momentum it ends the tick with. It never mutates
//! anything; the runtime applies the plan through its action layer.
use arrayvec::ArrayVec;

use crate::component::{BufferedMove, ComponentKind, Inertia};
use crate::config::MovementConfig;
use crate::entity::{Entity, EntityId};
use crate::geometry::{Direction, Point};
use crate::world::{PassOptions, PassabilityOracle, World};

/// Movement-relevant snapshot of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoverState {
    pub position: Point,
    pub inertia: Inertia,
    pub buffered_move: Option<BufferedMove>,
    pub brake: bool,
    pub turbo: bool,
}

impl MoverState {
    /// Reads the mover's components. An entity without inertia is treated as
    /// resting, facing the buffered direction when there is one.
    pub fn from_entity(entity: &Entity) -> Self {
        let buffered_move = entity.buffered_move().copied();
        let inertia = entity.inertia().copied().unwrap_or_else(|| {
            let facing = buffered_move.map_or(Direction::North, |input| input.direction);
            Inertia::new(facing, 0)
        });
        Self {
            position: entity.position(),
            inertia,
            buffered_move,
            brake: entity.has_component(ComponentKind::Brake),
            turbo: entity.has_component(ComponentKind::Turbo),
        }
    }
}

/// One tile hop of a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedMove {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementPrediction {
    /// Hops in execution order; each starts where the previous one ended.
    pub actions: ArrayVec<PlannedMove, 2>,
    pub final_inertia: Inertia,
    pub will_collide: bool,
    /// Tile the mover would have run into.
    pub collision: Option<Point>,
    pub is_reversing: bool,
    /// The plan includes a drift step; the drift-distance metric grows by one.
    pub drifted: bool,
}

impl MovementPrediction {
    fn idle(direction: Direction) -> Self {
        Self {
            actions: ArrayVec::new(),
            final_inertia: Inertia::new(direction, 0),
            will_collide: false,
            collision: None,
            is_reversing: false,
            drifted: false,
        }
    }

    fn collided(direction: Direction, at: Point) -> Self {
        Self {
            will_collide: true,
            collision: Some(at),
            ..Self::idle(direction)
        }
    }

    /// Destination of the last hop, if the plan moves at all.
    pub fn destination(&self) -> Option<Point> {
        self.actions.last().map(|hop| hop.to)
    }
}

/// Pure movement planner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementPredictor {
    config: MovementConfig,
}

impl MovementPredictor {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Plans the entity's movement for this tick. `None` for unknown ids.
    pub fn predict_move(&self, world: &World, id: &EntityId) -> Option<MovementPrediction> {
        let entity = world.get_entity(id)?;
        Some(self.predict(&MoverState::from_entity(entity), world))
    }

    pub fn predict(&self, state: &MoverState, oracle: &impl PassabilityOracle) -> MovementPrediction {
        let config = &self.config;
        let Inertia {
            direction: heading,
            magnitude,
        } = state.inertia;
        let max_speed = config.max_speed(state.turbo, magnitude);
        let origin = state.position;

        if state.buffered_move.is_none() && !state.brake {
            if magnitude <= 1 {
                return MovementPrediction::idle(heading);
            }
            let next = origin + heading;
            if !oracle.is_passable(origin, next, PassOptions::MOVEMENT) {
                return MovementPrediction::collided(heading, next);
            }
            let mut actions = ArrayVec::new();
            actions.push(PlannedMove {
                from: origin,
                to: next,
            });
            return MovementPrediction {
                actions,
                final_inertia: Inertia::new(heading, (magnitude + 1).min(max_speed)),
                ..MovementPrediction::idle(heading)
            };
        }

        let mut path: ArrayVec<Point, 2> = ArrayVec::new();
        let mut final_inertia = state.inertia;
        let mut is_reversing = false;
        let mut drifted = false;

        match state.buffered_move {
            // Braking, with or without input, takes the reversal branch.
            _ if state.brake => {
                if magnitude >= config.medium_speed_threshold {
                    path.push(origin + heading);
                    is_reversing = true;
                }
                final_inertia.magnitude = magnitude.saturating_sub(1);
            }
            None => {}
            Some(input) if input.direction == heading => {
                path.push(origin + input.direction);
                if !input.key_up {
                    final_inertia.magnitude = (magnitude + 1).min(max_speed);
                }
            }
            Some(input) if input.direction.is_opposite(heading) && magnitude > config.slide_speed => {
                if magnitude >= config.medium_speed_threshold {
                    path.push(origin + heading);
                    is_reversing = true;
                }
                final_inertia.magnitude = magnitude.saturating_sub(1).max(config.slide_speed + 1);
            }
            Some(input) if magnitude <= config.slide_speed => {
                path.push(origin + input.direction);
                final_inertia.direction = input.direction;
            }
            Some(input) => {
                let step = origin + input.direction;
                path.push(step);
                path.push(step + heading);
                drifted = true;

                let decayed = if state.turbo {
                    (magnitude + 1).min(max_speed)
                } else {
                    magnitude - 1
                };
                final_inertia.magnitude = decayed;
                if (config.slide_speed..=config.slide_speed + 1).contains(&decayed) {
                    final_inertia.direction = input.direction;
                }
            }
        }

        let mut actions = ArrayVec::new();
        let mut from = origin;
        for to in path {
            if !oracle.is_passable(from, to, PassOptions::MOVEMENT) {
                tracing::trace!(%from, %to, "planned hop collides");
                return MovementPrediction::collided(final_inertia.direction, to);
            }
            actions.push(PlannedMove { from, to });
            from = to;
        }

        MovementPrediction {
            actions,
            final_inertia,
            will_collide: false,
            collision: None,
            is_reversing,
            drifted,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    /// Open field with an optional set of blocked tiles.
    struct StubOracle {
        blocked: BTreeSet<Point>,
    }

    impl StubOracle {
        fn open() -> Self {
            Self {
                blocked: BTreeSet::new(),
            }
        }

        fn blocking(points: &[Point]) -> Self {
            Self {
                blocked: points.iter().copied().collect(),
            }
        }
    }

    impl PassabilityOracle for StubOracle {
        fn is_in_bounds(&self, _point: Point) -> bool {
            true
        }

        fn is_passable(&self, from: Point, to: Point, _options: PassOptions) -> bool {
            from.manhattan(to) == 1 && !self.blocked.contains(&to)
        }
    }

    fn mover(direction: Direction, magnitude: u32) -> MoverState {
        MoverState {
            position: Point::new(10, 10),
            inertia: Inertia::new(direction, magnitude),
            buffered_move: None,
            brake: false,
            turbo: false,
        }
    }

    fn destinations(prediction: &MovementPrediction) -> Vec<Point> {
        prediction.actions.iter().map(|hop| hop.to).collect()
    }

    #[test]
    fn coasting_moves_one_tile_and_speeds_up() {
        let prediction = MovementPredictor::default().predict(&mover(Direction::East, 3), &StubOracle::open());

        assert_eq!(destinations(&prediction), vec![Point::new(11, 10)]);
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::East, 4));
        assert!(!prediction.will_collide);
    }

    #[test]
    fn coasting_is_capped_at_max_speed() {
        let predictor = MovementPredictor::default();
        let prediction = predictor.predict(&mover(Direction::East, 5), &StubOracle::open());
        assert_eq!(prediction.final_inertia.magnitude, 5);

        let mut turbo = mover(Direction::East, 5);
        turbo.turbo = true;
        let prediction = predictor.predict(&turbo, &StubOracle::open());
        assert_eq!(prediction.final_inertia.magnitude, 6);
    }

    #[test]
    fn low_momentum_without_input_stops() {
        let prediction = MovementPredictor::default().predict(&mover(Direction::South, 1), &StubOracle::open());

        assert!(prediction.actions.is_empty());
        assert_eq!(prediction.final_inertia.magnitude, 0);
        assert!(!prediction.will_collide);
    }

    #[test]
    fn coasting_into_an_obstacle_collides() {
        let blocked = Point::new(11, 10);
        let prediction = MovementPredictor::default()
            .predict(&mover(Direction::East, 4), &StubOracle::blocking(&[blocked]));

        assert!(prediction.actions.is_empty());
        assert!(prediction.will_collide);
        assert_eq!(prediction.collision, Some(blocked));
        assert_eq!(prediction.final_inertia.magnitude, 0);
    }

    #[test]
    fn reversing_input_keeps_sliding_forward() {
        let mut state = mover(Direction::North, 4);
        state.buffered_move = Some(BufferedMove::new(Direction::South));
        let prediction = MovementPredictor::default().predict(&state, &StubOracle::open());

        assert_eq!(destinations(&prediction), vec![Point::new(10, 9)]);
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::North, 3));
        assert!(prediction.is_reversing);
    }

    #[test]
    fn reversing_never_drops_below_slide_floor() {
        let mut state = mover(Direction::West, 3);
        state.buffered_move = Some(BufferedMove::new(Direction::East));
        let prediction = MovementPredictor::default().predict(&state, &StubOracle::open());

        assert_eq!(prediction.final_inertia.magnitude, 3);
        assert_eq!(prediction.final_inertia.direction, Direction::West);
    }

    #[test]
    fn brake_decays_to_zero() {
        let predictor = MovementPredictor::default();
        let mut state = mover(Direction::East, 3);
        state.brake = true;

        let prediction = predictor.predict(&state, &StubOracle::open());
        assert_eq!(destinations(&prediction), vec![Point::new(11, 10)]);
        assert_eq!(prediction.final_inertia.magnitude, 2);
        assert!(prediction.is_reversing);

        state.inertia.magnitude = 1;
        let prediction = predictor.predict(&state, &StubOracle::open());
        assert!(prediction.actions.is_empty());
        assert_eq!(prediction.final_inertia.magnitude, 0);
        assert!(!prediction.is_reversing);
    }

    #[test]
    fn brake_overrides_buffered_input() {
        let mut state = mover(Direction::East, 4);
        state.brake = true;
        state.buffered_move = Some(BufferedMove::new(Direction::East));
        let prediction = MovementPredictor::default().predict(&state, &StubOracle::open());

        assert_eq!(destinations(&prediction), vec![Point::new(11, 10)]);
        assert_eq!(prediction.final_inertia.magnitude, 3);
    }

    #[test]
    fn holding_accelerates_and_tapping_does_not() {
        let predictor = MovementPredictor::default();
        let mut state = mover(Direction::East, 2);
        state.buffered_move = Some(BufferedMove::new(Direction::East));
        assert_eq!(
            predictor
                .predict(&state, &StubOracle::open())
                .final_inertia
                .magnitude,
            3
        );

        state.buffered_move = Some(BufferedMove::tap(Direction::East));
        let prediction = predictor.predict(&state, &StubOracle::open());
        assert_eq!(prediction.final_inertia.magnitude, 2);
        assert_eq!(destinations(&prediction), vec![Point::new(11, 10)]);
    }

    #[test]
    fn low_speed_turns_are_instant() {
        let mut state = mover(Direction::North, 2);
        state.buffered_move = Some(BufferedMove::new(Direction::East));
        let prediction = MovementPredictor::default().predict(&state, &StubOracle::open());

        assert_eq!(destinations(&prediction), vec![Point::new(11, 10)]);
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::East, 2));
        assert!(!prediction.drifted);
    }

    #[test]
    fn opposite_input_at_low_speed_snaps() {
        let mut state = mover(Direction::North, 2);
        state.buffered_move = Some(BufferedMove::new(Direction::South));
        let prediction = MovementPredictor::default().predict(&state, &StubOracle::open());

        assert_eq!(destinations(&prediction), vec![Point::new(10, 11)]);
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::South, 2));
        assert!(!prediction.is_reversing);
        assert!(!prediction.drifted);
    }

    #[test]
    fn high_speed_turns_drift() {
        let predictor = MovementPredictor::default();
        let mut state = mover(Direction::North, 4);
        state.buffered_move = Some(BufferedMove::new(Direction::East));

        let prediction = predictor.predict(&state, &StubOracle::open());
        assert_eq!(
            destinations(&prediction),
            vec![Point::new(11, 10), Point::new(11, 9)]
        );
        assert!(prediction.drifted);
        // Decayed to 3, inside the turning band.
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::East, 3));

        state.inertia.magnitude = 5;
        let prediction = predictor.predict(&state, &StubOracle::open());
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::North, 4));

        state.turbo = true;
        state.inertia.magnitude = 4;
        let prediction = predictor.predict(&state, &StubOracle::open());
        assert_eq!(prediction.final_inertia, Inertia::new(Direction::North, 5));
    }

    #[test]
    fn any_blocked_hop_discards_the_plan() {
        let mut state = mover(Direction::North, 4);
        state.buffered_move = Some(BufferedMove::new(Direction::East));
        let blocked = Point::new(11, 9);
        let prediction =
            MovementPredictor::default().predict(&state, &StubOracle::blocking(&[blocked]));

        assert!(prediction.actions.is_empty());
        assert!(prediction.will_collide);
        assert_eq!(prediction.collision, Some(blocked));
        assert_eq!(prediction.final_inertia.magnitude, 0);
        assert!(!prediction.drifted);
    }

    #[test]
    fn predictions_are_deterministic() {
        let predictor = MovementPredictor::default();
        let mut state = mover(Direction::West, 5);
        state.buffered_move = Some(BufferedMove::new(Direction::South));
        state.turbo = true;

        assert_eq!(
            predictor.predict(&state, &StubOracle::open()),
            predictor.predict(&state, &StubOracle::open())
        );
    }

    #[test]
    fn predict_move_reads_world_components() {
        let mut world = World::new(5, 1);
        world.add_entity(
            Entity::with_id("racer".into(), Point::new(0, 0))
                .with_component(Inertia::new(Direction::East, 3)),
        );
        world.add_entity(
            Entity::new(Point::new(1, 0)).with_component(crate::component::Component::Impathable),
        );

        let prediction = MovementPredictor::default()
            .predict_move(&world, &"racer".into())
            .expect("entity exists");
        assert_eq!(destinations(&prediction), vec![Point::new(1, 0)]);
        assert!(MovementPredictor::default()
            .predict_move(&world, &"ghost".into())
            .is_none());
    }
}

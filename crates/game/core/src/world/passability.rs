//! Movement legality between adjacent tiles.
use crate::component::ComponentKind;
use crate::geometry::Point;

use super::World;

/// Switches for [`World::is_passable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassOptions {
    /// Skip the wall check and the impassable-entity check.
    ///
    /// Despite the name this also ignores walls. Callers probing "could
    /// anything ever stand there" rely on that.
    pub ignore_impassable: bool,
    /// Accept the eight surrounding tiles instead of only the four orthogonal ones.
    pub allow_diagonal: bool,
    /// Let impathable entities through.
    pub ignore_impathable: bool,
}

impl PassOptions {
    /// Checks used for live movers: walls and impassable entities stop them,
    /// impathable decorations do not.
    pub const MOVEMENT: Self = Self {
        ignore_impassable: false,
        allow_diagonal: false,
        ignore_impathable: true,
    };

    /// Checks used by the pathfinder: everything obstructs.
    pub const PATHING: Self = Self {
        ignore_impassable: false,
        allow_diagonal: false,
        ignore_impathable: false,
    };

    pub const fn with_diagonal(mut self, allow_diagonal: bool) -> Self {
        self.allow_diagonal = allow_diagonal;
        self
    }
}

/// Read-only passability capability consulted by movement planners.
pub trait PassabilityOracle {
    fn is_in_bounds(&self, point: Point) -> bool;

    fn is_passable(&self, from: Point, to: Point, options: PassOptions) -> bool;
}

impl World {
    /// Whether a mover may step from `from` onto the adjacent tile `to`.
    ///
    /// Checks run in order: adjacency, bounds of `to`, the
    /// `ignore_impassable` short-circuit, walls between the tiles, then the
    /// entities standing on `to`.
    pub fn is_passable(&self, from: Point, to: Point, options: PassOptions) -> bool {
        let adjacent = if options.allow_diagonal {
            from != to && from.chebyshev(to) <= 1
        } else {
            from.manhattan(to) == 1
        };
        if !adjacent || !self.is_in_bounds(to) {
            return false;
        }
        if options.ignore_impassable {
            return true;
        }
        if self.step_crosses_wall(from, to) {
            return false;
        }
        self.tile_admits(to, options.ignore_impathable)
    }

    /// Wall check for an adjacent step. A diagonal step is blocked only when
    /// both orthogonal detours cross an impassable wall.
    pub(crate) fn step_crosses_wall(&self, from: Point, to: Point) -> bool {
        if from.x == to.x || from.y == to.y {
            return self.wall_blocks(from, to);
        }
        [Point::new(to.x, from.y), Point::new(from.x, to.y)]
            .into_iter()
            .all(|corner| self.wall_blocks(from, corner) || self.wall_blocks(corner, to))
    }

    /// Whether the entities on `point` let a mover in.
    pub(crate) fn tile_admits(&self, point: Point, ignore_impathable: bool) -> bool {
        self.get_entities_at(point).into_iter().all(|entity| {
            !entity.has_component(ComponentKind::Impassable)
                && (ignore_impathable || !entity.has_component(ComponentKind::Impathable))
        })
    }
}

impl PassabilityOracle for World {
    fn is_in_bounds(&self, point: Point) -> bool {
        World::is_in_bounds(self, point)
    }

    fn is_passable(&self, from: Point, to: Point, options: PassOptions) -> bool {
        World::is_passable(self, from, to, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, WallProperties};
    use crate::entity::Entity;
    use crate::geometry::Direction;

    fn open(world: &World, from: (i32, i32), to: (i32, i32)) -> bool {
        world.is_passable(
            Point::new(from.0, from.1),
            Point::new(to.0, to.1),
            PassOptions::default(),
        )
    }

    #[test]
    fn adjacency_depends_on_diagonal_flag() {
        let world = World::new(4, 4);
        assert!(open(&world, (1, 1), (1, 2)));
        assert!(!open(&world, (1, 1), (2, 2)));
        assert!(!open(&world, (1, 1), (1, 1)));
        assert!(!open(&world, (1, 1), (1, 3)));

        let diagonal = PassOptions::default().with_diagonal(true);
        assert!(world.is_passable(Point::new(1, 1), Point::new(2, 2), diagonal));
        assert!(!world.is_passable(Point::new(1, 1), Point::new(1, 1), diagonal));
    }

    #[test]
    fn out_of_bounds_is_never_passable() {
        let world = World::new(2, 2);
        let ghost = PassOptions {
            ignore_impassable: true,
            ..PassOptions::default()
        };
        assert!(!world.is_passable(Point::new(0, 0), Point::new(-1, 0), ghost));
        assert!(!open(&world, (1, 1), (2, 1)));
    }

    #[test]
    fn empty_world_is_symmetric() {
        let world = World::new(3, 3);
        for (a, b) in [((0, 0), (1, 0)), ((1, 1), (1, 2)), ((2, 2), (2, 1))] {
            assert_eq!(open(&world, a, b), open(&world, b, a));
        }
    }

    #[test]
    fn impassable_walls_block_both_ways_unless_ignored() {
        let mut world = World::new(3, 3);
        world.set_wall(
            Point::new(1, 1),
            Direction::East,
            WallProperties::IMPASSABLE,
            "#fff",
        );
        assert!(!open(&world, (1, 1), (2, 1)));
        assert!(!open(&world, (2, 1), (1, 1)));

        let ghost = PassOptions {
            ignore_impassable: true,
            ..PassOptions::default()
        };
        assert!(world.is_passable(Point::new(1, 1), Point::new(2, 1), ghost));

        world.set_wall(Point::new(0, 0), Direction::East, WallProperties::OPAQUE, "#fff");
        assert!(open(&world, (0, 0), (1, 0)));
    }

    #[test]
    fn diagonal_needs_one_wall_free_detour() {
        let mut world = World::new(3, 3);
        let diagonal = PassOptions::default().with_diagonal(true);
        world.set_wall(
            Point::new(0, 0),
            Direction::East,
            WallProperties::IMPASSABLE,
            "#fff",
        );
        assert!(world.is_passable(Point::new(0, 0), Point::new(1, 1), diagonal));

        world.set_wall(
            Point::new(0, 0),
            Direction::South,
            WallProperties::IMPASSABLE,
            "#fff",
        );
        assert!(!world.is_passable(Point::new(0, 0), Point::new(1, 1), diagonal));
    }

    #[test]
    fn impathable_only_blocks_when_not_ignored() {
        let mut world = World::new(3, 1);
        world.add_entity(Entity::new(Point::new(1, 0)).with_component(Component::Impathable));
        world.add_entity(Entity::new(Point::new(2, 0)).with_component(Component::Impassable));

        assert!(!world.is_passable(Point::new(0, 0), Point::new(1, 0), PassOptions::PATHING));
        assert!(world.is_passable(Point::new(0, 0), Point::new(1, 0), PassOptions::MOVEMENT));
        assert!(!world.is_passable(Point::new(1, 0), Point::new(2, 0), PassOptions::MOVEMENT));
    }
}

//! Directional wall storage.
//!
//! Each tile owns at most a north and a west segment. Requests for the south
//! or east edge of a tile address the neighbour's north or west edge, and the
//! segments live on a backing entity carrying a [`Wall`] component.
use crate::component::{Component, ComponentKind, Wall, WallEdge, WallProperties, WallSegment};
use crate::entity::{Entity, EntityId};
use crate::geometry::{Direction, Point};

use super::World;

impl World {
    /// Places a wall segment on the `direction` edge of `point`.
    ///
    /// Returns `false` when the owning tile lies outside the world.
    pub fn set_wall(
        &mut self,
        point: Point,
        direction: Direction,
        properties: WallProperties,
        color: impl Into<String>,
    ) -> bool {
        let (owner, edge) = canonical(point, direction);
        if !self.is_in_bounds(owner) {
            return false;
        }
        let segment = WallSegment::new(properties, color);

        match self.wall_entity_at(owner) {
            Some(id) => self.modify_component(&id, ComponentKind::Wall, |component| {
                if let Component::Wall(wall) = component {
                    wall.set_segment(edge, Some(segment));
                }
            }),
            None => {
                let mut wall = Wall::default();
                wall.set_segment(edge, Some(segment));
                let id = self.fresh_id();
                self.add_entity(Entity::with_id(id, owner).with_component(wall))
            }
        }
    }

    /// Removes the wall segment on the `direction` edge of `point`.
    ///
    /// The backing entity is discarded once it holds no segments. Returns
    /// whether a segment was removed.
    pub fn remove_wall(&mut self, point: Point, direction: Direction) -> bool {
        let (owner, edge) = canonical(point, direction);
        if self.get_wall(point, direction).is_none() {
            return false;
        }
        let Some(id) = self.wall_entity_at(owner) else {
            return false;
        };

        let emptied = self
            .get_entity(&id)
            .and_then(Entity::wall)
            .is_some_and(|wall| {
                let mut remaining = wall.clone();
                remaining.set_segment(edge, None);
                remaining.is_empty()
            });

        if emptied {
            self.remove_entity(&id).is_some()
        } else {
            self.modify_component(&id, ComponentKind::Wall, |component| {
                if let Component::Wall(wall) = component {
                    wall.set_segment(edge, None);
                }
            })
        }
    }

    pub fn has_wall(&self, point: Point, direction: Direction) -> bool {
        self.get_wall(point, direction).is_some()
    }

    pub fn get_wall(&self, point: Point, direction: Direction) -> Option<&WallSegment> {
        let (owner, edge) = canonical(point, direction);
        if !self.is_in_bounds(owner) {
            return None;
        }
        self.get_entities_at(owner)
            .into_iter()
            .filter_map(Entity::wall)
            .find_map(|wall| wall.segment(edge))
    }

    /// Whether an impassable wall separates two orthogonally adjacent tiles.
    pub(crate) fn wall_blocks(&self, from: Point, to: Point) -> bool {
        Direction::between(from, to)
            .and_then(|direction| self.get_wall(from, direction))
            .is_some_and(WallSegment::is_impassable)
    }

    fn wall_entity_at(&self, owner: Point) -> Option<EntityId> {
        self.get_entities_at(owner)
            .into_iter()
            .find(|entity| entity.has_component(ComponentKind::Wall))
            .map(|entity| entity.id().clone())
    }
}

fn canonical(point: Point, direction: Direction) -> (Point, WallEdge) {
    let (edge, (dx, dy)) = WallEdge::canonical(direction);
    (point.offset(dx, dy), edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn east_wall_is_neighbours_west_wall() {
        let mut world = World::new(4, 4);
        assert!(world.set_wall(Point::new(1, 1), Direction::East, WallProperties::SOLID, "#999"));

        assert!(world.has_wall(Point::new(2, 1), Direction::West));
        assert_eq!(
            world
                .get_entities_with_component(ComponentKind::Wall)
                .first()
                .map(|e| e.position()),
            Some(Point::new(2, 1))
        );
    }

    #[test]
    fn wall_past_the_border_is_rejected() {
        let mut world = World::new(3, 3);
        assert!(!world.set_wall(Point::new(2, 2), Direction::South, WallProperties::SOLID, "#999"));
        assert!(!world.has_wall(Point::new(2, 2), Direction::South));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn both_edges_share_one_backing_entity() {
        let mut world = World::new(3, 3);
        world.set_wall(Point::new(1, 1), Direction::North, WallProperties::SOLID, "#999");
        world.set_wall(Point::new(1, 1), Direction::West, WallProperties::RENDER, "#555");
        assert_eq!(world.entity_count(), 1);

        assert!(world.remove_wall(Point::new(1, 1), Direction::North));
        assert_eq!(world.entity_count(), 1);
        assert!(world.has_wall(Point::new(1, 1), Direction::West));

        assert!(world.remove_wall(Point::new(0, 1), Direction::East));
        assert_eq!(world.entity_count(), 0);
        assert!(!world.remove_wall(Point::new(1, 1), Direction::West));
    }

    #[test]
    fn opaque_walls_reach_the_fov_map() {
        let mut world = World::new(3, 3);
        world.set_wall(Point::new(1, 1), Direction::South, WallProperties::SOLID, "#999");
        assert!(world.fov_map().has_wall(1, 2, Direction::North));

        world.set_wall(
            Point::new(1, 1),
            Direction::South,
            WallProperties::RENDER | WallProperties::IMPASSABLE,
            "#44f",
        );
        assert!(!world.fov_map().has_wall(1, 2, Direction::North));

        world.remove_wall(Point::new(1, 1), Direction::South);
        assert!(!world.fov_map().has_wall(1, 1, Direction::South));
    }
}

//! Field-of-view maintenance and visibility queries.
use std::collections::BTreeSet;

use crate::entity::{Entity, EntityId};
use crate::fov::compute_field_of_view;
use crate::geometry::Point;

use super::{World, WorldEvent};

impl World {
    /// Rebuilds the FOV map from every live entity, then refreshes player vision.
    pub fn rebuild_fov(&mut self) {
        self.fov_map.clear();
        let tiles: Vec<Point> = self.spatial_map.keys().copied().collect();
        for tile in tiles {
            self.write_fov_tile(tile);
        }
        tracing::debug!(entities = self.entities.len(), "rebuilt field-of-view map");
        self.update_player_vision();
    }

    /// Re-derives the FOV contribution of the listed tiles and refreshes
    /// player vision. Does nothing while the world is being built.
    pub(crate) fn update_fov_for_tiles(&mut self, tiles: &[Point]) {
        if self.building_world {
            return;
        }
        for tile in tiles {
            self.write_fov_tile(*tile);
        }
        self.update_player_vision();
    }

    pub(crate) fn refresh_fov_tile(&mut self, tile: Point) {
        if !self.building_world {
            self.write_fov_tile(tile);
        }
    }

    pub(crate) fn update_player_vision_if_ready(&mut self) {
        if !self.building_world {
            self.update_player_vision();
        }
    }

    /// Recomputes what the player sees.
    ///
    /// The visible set is replaced wholesale; newly seen tiles join the
    /// discovered set, which never shrinks.
    pub fn update_player_vision(&mut self) {
        let Some(player) = self.player() else {
            return;
        };
        let player_pos = player.position();
        let visible = self.visible_tiles(player);

        self.discovered_locations.extend(visible.iter().copied());
        self.player_visible_locations = visible;

        self.events.emit(WorldEvent::FovChanged);
        self.events.emit(WorldEvent::PlayerVisionUpdated {
            player_pos,
            visible_locations: self.player_visible_locations.iter().copied().collect(),
        });
    }

    /// Tiles the entity can currently see; empty without a vision component.
    pub fn get_visible_tiles_for_entity(&self, id: &EntityId) -> BTreeSet<Point> {
        self.get_entity(id)
            .map(|entity| self.visible_tiles(entity))
            .unwrap_or_default()
    }

    pub fn can_entity_see_position(&self, observer: &EntityId, point: Point) -> bool {
        self.get_visible_tiles_for_entity(observer).contains(&point)
    }

    pub fn can_entity_see_entity(&self, observer: &EntityId, target: &EntityId) -> bool {
        self.get_entity(target)
            .is_some_and(|target| self.can_entity_see_position(observer, target.position()))
    }

    pub fn player_visible_locations(&self) -> &BTreeSet<Point> {
        &self.player_visible_locations
    }

    pub fn discovered_locations(&self) -> &BTreeSet<Point> {
        &self.discovered_locations
    }

    pub fn is_location_visible(&self, point: Point) -> bool {
        self.player_visible_locations.contains(&point)
    }

    pub fn is_location_discovered(&self, point: Point) -> bool {
        self.discovered_locations.contains(&point)
    }

    fn visible_tiles(&self, entity: &Entity) -> BTreeSet<Point> {
        let Some(vision) = entity.vision() else {
            return BTreeSet::new();
        };
        let origin = entity.position();

        if vision.ignore_opacity {
            let r = i32::try_from(vision.radius).unwrap_or(i32::MAX / 2);
            let mut tiles = BTreeSet::new();
            for y in origin.y.saturating_sub(r)..=origin.y.saturating_add(r) {
                for x in origin.x.saturating_sub(r)..=origin.x.saturating_add(r) {
                    let point = Point::new(x, y);
                    if self.is_in_bounds(point) {
                        tiles.insert(point);
                    }
                }
            }
            return tiles;
        }

        compute_field_of_view(&self.fov_map, origin.x, origin.y, vision.radius).into_points()
    }

    /// Writes one tile's bodies and opaque wall edges into the FOV map.
    fn write_fov_tile(&mut self, tile: Point) {
        self.fov_map.clear_tile(tile);
        let Some(ids) = self.spatial_map.get(&tile) else {
            return;
        };

        for id in ids {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if entity.is_opaque() {
                self.fov_map.add_body(tile.x, tile.y);
            }
            if let Some(wall) = entity.wall() {
                for edge in wall.opaque_edges() {
                    self.fov_map.add_wall(tile.x, tile.y, edge.into());
                }
            }
        }
    }
}

//! Authoritative entity registry.
//!
//! [`World`] owns every live [`Entity`] and keeps four derived structures in
//! lockstep with them:
//! - the spatial index (tile → ids occupying it, empty buckets pruned)
//! - the component index (kind → ids carrying it)
//! - the field-of-view map (opaque bodies and opaque wall edges)
//! - the player vision caches (visible now, discovered so far)
//!
//! All mutation goes through the methods here. Systems and actions hold an
//! [`EntityId`] and ask the world to change things; nothing outside the crate
//! can move an entity or edit its components directly.
pub mod events;
mod passability;
mod pathfinding;
#[cfg(feature = "serde")]
mod persistence;
mod vision;
mod walls;

pub use events::{EventBus, Followups, HandlerId, WorldEvent, WorldEventKind};
pub use passability::{PassOptions, PassabilityOracle};
pub use pathfinding::Heuristic;
#[cfg(feature = "serde")]
pub use persistence::{SerializedEntity, SerializedWorld};

use std::collections::{BTreeMap, BTreeSet};

use crate::component::{Component, ComponentKind};
use crate::entity::{Entity, EntityId, PLAYER_TAG};
use crate::error::WorldError;
use crate::fov::FieldOfViewMap;
use crate::geometry::Point;

pub struct World {
    width: u32,
    height: u32,
    entities: BTreeMap<EntityId, Entity>,
    spatial_map: BTreeMap<Point, BTreeSet<EntityId>>,
    component_index: BTreeMap<ComponentKind, BTreeSet<EntityId>>,
    tag_index: BTreeMap<String, BTreeSet<EntityId>>,
    fov_map: FieldOfViewMap,
    events: EventBus,
    player_visible_locations: BTreeSet<Point>,
    discovered_locations: BTreeSet<Point>,
    building_world: bool,
}

impl World {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            entities: BTreeMap::new(),
            spatial_map: BTreeMap::new(),
            component_index: BTreeMap::new(),
            tag_index: BTreeMap::new(),
            fov_map: FieldOfViewMap::new(to_i32(width), to_i32(height)),
            events: EventBus::new(),
            player_visible_locations: BTreeSet::new(),
            discovered_locations: BTreeSet::new(),
            building_world: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_in_bounds(&self, point: Point) -> bool {
        u32::try_from(point.x).is_ok_and(|x| x < self.width)
            && u32::try_from(point.y).is_ok_and(|y| y < self.height)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn fov_map(&self) -> &FieldOfViewMap {
        &self.fov_map
    }

    // ===== lifecycle =====

    /// Enters bulk-load mode: incremental FOV work is skipped until [`ready`](Self::ready).
    pub fn unready(&mut self) {
        self.building_world = true;
    }

    /// Leaves bulk-load mode and performs exactly one full FOV rebuild.
    pub fn ready(&mut self) {
        self.building_world = false;
        self.rebuild_fov();
    }

    pub fn is_building(&self) -> bool {
        self.building_world
    }

    // ===== events =====

    pub fn on<F>(&mut self, kind: WorldEventKind, handler: F) -> HandlerId
    where
        F: FnMut(&WorldEvent, &mut Followups) + 'static,
    {
        self.events.on(kind, handler)
    }

    pub fn off(&mut self, kind: WorldEventKind, handler: HandlerId) -> bool {
        self.events.off(kind, handler)
    }

    pub fn emit(&mut self, event: WorldEvent) {
        self.events.emit(event);
    }

    pub fn start_batch(&mut self) {
        self.events.start_batch();
    }

    pub fn end_batch(&mut self) {
        self.events.end_batch();
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ===== registry =====

    /// Generated id that no live entity uses.
    pub(crate) fn fresh_id(&self) -> EntityId {
        loop {
            let id = EntityId::generate();
            if !self.entities.contains_key(&id) {
                return id;
            }
        }
    }

    /// Registers an entity.
    ///
    /// Positions outside the grid are ignored without error; generators rely
    /// on this when stamping patterns that overlap the border. Returns whether
    /// the entity was registered.
    pub fn add_entity(&mut self, mut entity: Entity) -> bool {
        let position = entity.position();
        if !self.is_in_bounds(position) {
            tracing::trace!(id = %entity.id(), %position, "ignoring out-of-bounds entity");
            return false;
        }

        if let Some(previous) = self.entities.remove(entity.id()) {
            tracing::warn!(id = %entity.id(), "entity id collision, replacing existing entity");
            self.unindex(&previous);
            if affects_fov(&previous) {
                self.refresh_fov_tile(previous.position());
            }
        }

        entity.id().reserve();
        entity.set_in_world(true);
        self.index(&entity);
        let refresh_fov = affects_fov(&entity);
        let refresh_vision = refresh_fov || entity.is_player();
        self.entities.insert(entity.id().clone(), entity.clone());

        if refresh_fov {
            self.refresh_fov_tile(position);
        }
        if refresh_vision {
            self.update_player_vision_if_ready();
        }
        self.events.emit(WorldEvent::EntityAdded { entity });
        true
    }

    /// Moves an entity to `to`.
    ///
    /// Only grid bounds are checked; callers decide passability beforehand
    /// with [`is_passable`](Self::is_passable). Returns `false` with no side
    /// effects for unknown ids or out-of-bounds targets.
    pub fn move_entity(&mut self, id: &EntityId, to: Point) -> bool {
        if !self.is_in_bounds(to) {
            return false;
        }
        let Some(entity) = self.entities.get_mut(id) else {
            tracing::warn!(%id, "move_entity: unknown entity");
            return false;
        };

        let from = entity.position();
        entity.set_position(to);
        let refresh_fov = affects_fov(entity);
        let refresh_vision = refresh_fov || entity.is_player();

        remove_from_bucket(&mut self.spatial_map, &from, id);
        self.spatial_map.entry(to).or_default().insert(id.clone());

        if refresh_fov {
            self.refresh_fov_tile(from);
            self.refresh_fov_tile(to);
        }
        if refresh_vision {
            self.update_player_vision_if_ready();
        }

        self.events.emit(WorldEvent::EntityMoved {
            entity: id.clone(),
            from,
            to,
        });
        true
    }

    /// Removes an entity and every trace of it from the indices.
    pub fn remove_entity(&mut self, id: &EntityId) -> Option<Entity> {
        let Some(mut entity) = self.entities.remove(id) else {
            tracing::warn!(%id, "remove_entity: unknown entity");
            return None;
        };

        self.unindex(&entity);
        entity.set_in_world(false);
        let position = entity.position();
        if affects_fov(&entity) {
            self.refresh_fov_tile(position);
        }

        self.events.emit(WorldEvent::EntityRemoved {
            entity: entity.clone(),
            position,
        });
        self.update_player_vision_if_ready();
        Some(entity)
    }

    // ===== queries =====

    pub fn get_entity(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_entities_at(&self, point: Point) -> Vec<&Entity> {
        self.spatial_map
            .get(&point)
            .map(|ids| self.resolve(ids.iter()))
            .unwrap_or_default()
    }

    pub fn get_entities_with_component(&self, kind: ComponentKind) -> Vec<&Entity> {
        self.component_index
            .get(&kind)
            .map(|ids| self.resolve(ids.iter()))
            .unwrap_or_default()
    }

    /// Entities carrying every kind in `kinds`.
    pub fn get_entities_with_components(&self, kinds: &[ComponentKind]) -> Vec<&Entity> {
        let Some((first, rest)) = kinds.split_first() else {
            return Vec::new();
        };
        self.get_entities_with_component(*first)
            .into_iter()
            .filter(|entity| rest.iter().all(|kind| entity.has_component(*kind)))
            .collect()
    }

    /// Entities carrying every tag in `tags`.
    pub fn get_entities_with_tags(&self, tags: &[&str]) -> Vec<&Entity> {
        let Some((first, rest)) = tags.split_first() else {
            return Vec::new();
        };
        self.tag_index
            .get(*first)
            .map(|ids| self.resolve(ids.iter()))
            .unwrap_or_default()
            .into_iter()
            .filter(|entity| rest.iter().all(|tag| entity.has_tag(tag)))
            .collect()
    }

    /// Entities inside the rectangle starting at `(x, y)`.
    ///
    /// The rectangle must have a positive size and lie fully inside the world.
    pub fn get_entities_in_area(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<Vec<&Entity>, WorldError> {
        let invalid = WorldError::InvalidArea {
            x,
            y,
            width,
            height,
        };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let far = Point::new(x.saturating_add(width - 1), y.saturating_add(height - 1));
        if !self.is_in_bounds(Point::new(x, y)) || !self.is_in_bounds(far) {
            return Err(invalid);
        }

        let mut found = Vec::new();
        for ty in y..=far.y {
            for tx in x..=far.x {
                found.extend(self.get_entities_at(Point::new(tx, ty)));
            }
        }
        Ok(found)
    }

    /// The single entity tagged as the player.
    pub fn get_player(&self) -> Result<&Entity, WorldError> {
        let players = self.get_entities_with_tags(&[PLAYER_TAG]);
        match players.as_slice() {
            [] => Err(WorldError::PlayerNotFound),
            [player] => Ok(*player),
            many => Err(WorldError::MultiplePlayers(many.len())),
        }
    }

    pub(crate) fn player(&self) -> Option<&Entity> {
        self.tag_index
            .get(PLAYER_TAG)
            .and_then(|ids| ids.iter().next())
            .and_then(|id| self.entities.get(id))
    }

    // ===== component and tag mutation =====

    /// Attaches a component, replacing any component of the same kind.
    pub fn add_component(&mut self, id: &EntityId, component: impl Into<Component>) -> bool {
        let component = component.into();
        let kind = component.kind();
        let Some(entity) = self.entities.get_mut(id) else {
            tracing::warn!(%id, %kind, "add_component: unknown entity");
            return false;
        };

        let replaced = entity.components_mut().insert(component.clone());
        let position = entity.position();
        self.component_index
            .entry(kind)
            .or_default()
            .insert(id.clone());

        self.after_fov_component_change(kind, position);
        let event = if replaced.is_some() {
            WorldEvent::ComponentModified {
                entity: id.clone(),
                component,
            }
        } else {
            WorldEvent::ComponentAdded {
                entity: id.clone(),
                component,
            }
        };
        self.events.emit(event);
        self.events
            .emit(WorldEvent::EntityModified { entity: id.clone() });
        true
    }

    pub fn remove_component(&mut self, id: &EntityId, kind: ComponentKind) -> Option<Component> {
        let entity = self.entities.get_mut(id)?;
        let removed = entity.components_mut().remove(kind)?;
        let position = entity.position();
        remove_from_bucket(&mut self.component_index, &kind, id);

        self.after_fov_component_change(kind, position);
        self.events.emit(WorldEvent::ComponentRemoved {
            entity: id.clone(),
            component: removed.clone(),
        });
        self.events
            .emit(WorldEvent::EntityModified { entity: id.clone() });
        Some(removed)
    }

    /// Edits a component in place.
    ///
    /// The closure must keep the component's kind; a change of variant is
    /// rolled back and reported as `false`.
    pub fn modify_component<F>(&mut self, id: &EntityId, kind: ComponentKind, edit: F) -> bool
    where
        F: FnOnce(&mut Component),
    {
        let Some(entity) = self.entities.get_mut(id) else {
            tracing::warn!(%id, %kind, "modify_component: unknown entity");
            return false;
        };
        let position = entity.position();
        let Some(component) = entity.components_mut().get_mut(kind) else {
            return false;
        };

        let original = component.clone();
        edit(component);
        if component.kind() != kind {
            tracing::warn!(%id, %kind, "modify_component changed the component kind, reverting");
            *component = original;
            return false;
        }
        let updated = component.clone();

        self.after_fov_component_change(kind, position);
        self.events.emit(WorldEvent::ComponentModified {
            entity: id.clone(),
            component: updated,
        });
        self.events
            .emit(WorldEvent::EntityModified { entity: id.clone() });
        true
    }

    pub fn add_tag(&mut self, id: &EntityId, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let Some(entity) = self.entities.get_mut(id) else {
            tracing::warn!(%id, %tag, "add_tag: unknown entity");
            return false;
        };
        if !entity.insert_tag(tag.clone()) {
            return true;
        }

        let is_player_tag = tag == PLAYER_TAG;
        self.tag_index.entry(tag).or_default().insert(id.clone());
        if is_player_tag {
            self.update_player_vision_if_ready();
        }
        self.events
            .emit(WorldEvent::EntityModified { entity: id.clone() });
        true
    }

    pub fn remove_tag(&mut self, id: &EntityId, tag: &str) -> bool {
        let Some(entity) = self.entities.get_mut(id) else {
            return false;
        };
        if !entity.take_tag(tag) {
            return false;
        }

        remove_from_bucket(&mut self.tag_index, tag, id);
        if tag == PLAYER_TAG {
            self.update_player_vision_if_ready();
        }
        self.events
            .emit(WorldEvent::EntityModified { entity: id.clone() });
        true
    }

    // ===== internals =====

    fn resolve<'a>(&'a self, ids: impl Iterator<Item = &'a EntityId>) -> Vec<&'a Entity> {
        ids.filter_map(|id| self.entities.get(id)).collect()
    }

    fn index(&mut self, entity: &Entity) {
        let id = entity.id();
        self.spatial_map
            .entry(entity.position())
            .or_default()
            .insert(id.clone());
        for kind in entity.components().kinds() {
            self.component_index
                .entry(kind)
                .or_default()
                .insert(id.clone());
        }
        for tag in entity.tags() {
            self.tag_index
                .entry(tag.to_owned())
                .or_default()
                .insert(id.clone());
        }
    }

    fn unindex(&mut self, entity: &Entity) {
        let id = entity.id();
        remove_from_bucket(&mut self.spatial_map, &entity.position(), id);
        for kind in entity.components().kinds() {
            remove_from_bucket(&mut self.component_index, &kind, id);
        }
        for tag in entity.tags() {
            remove_from_bucket(&mut self.tag_index, tag, id);
        }
    }

    fn after_fov_component_change(&mut self, kind: ComponentKind, position: Point) {
        if kind.affects_fov() {
            self.update_fov_for_tiles(&[position]);
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("entities", &self.entities.len())
            .field("building_world", &self.building_world)
            .field("events", &self.events)
            .finish()
    }
}

fn affects_fov(entity: &Entity) -> bool {
    entity.is_opaque() || entity.has_component(ComponentKind::Wall)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Removes `id` from the bucket at `key`, dropping the bucket once empty.
fn remove_from_bucket<K, Q>(map: &mut BTreeMap<K, BTreeSet<EntityId>>, key: &Q, id: &EntityId)
where
    K: Ord + std::borrow::Borrow<Q>,
    Q: Ord + ?Sized,
{
    if let Some(bucket) = map.get_mut(key) {
        bucket.remove(id);
        if bucket.is_empty() {
            map.remove(key);
        }
    }
}

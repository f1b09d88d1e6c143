//! Entities and their component stores.
//!
//! A standalone [`Entity`] can be assembled freely with the builder methods.
//! Once it has been handed to a [`World`](crate::world::World), its position,
//! components and tags change only through the world so the spatial index,
//! the component index and the field-of-view map stay in sync.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::component::{
    BufferedMove, Component, ComponentKind, Cooldown, EnemyAi, Follower, Inertia, Metrics, Symbol,
    Vision, Wall,
};
use crate::geometry::Point;

/// Tag carried by the single player-controlled entity.
pub const PLAYER_TAG: &str = "player";

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);
const GENERATED_PREFIX: &str = "entity-";

/// Stable, unique entity identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocates a fresh `entity-<n>` identifier.
    pub fn generate() -> Self {
        let n = NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("{GENERATED_PREFIX}{n}"))
    }

    /// Counter value encoded in a generated-style id, if any.
    fn generated_index(&self) -> Option<u64> {
        self.0.strip_prefix(GENERATED_PREFIX)?.parse().ok()
    }

    /// Moves the generator past this id so `generate` never hands it out.
    /// Ids loaded from snapshots and level files may use the generated form.
    pub(crate) fn reserve(&self) {
        if let Some(n) = self.generated_index() {
            NEXT_ENTITY_ID.fetch_max(n.saturating_add(1), Ordering::Relaxed);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Per-entity map from component kind to component, one per kind.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComponentStore {
    components: BTreeMap<ComponentKind, Component>,
}

impl ComponentStore {
    /// Inserts a component, returning the one it replaced.
    pub fn insert(&mut self, component: Component) -> Option<Component> {
        self.components.insert(component.kind(), component)
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.components.remove(&kind)
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub(crate) fn get_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    position: Point,
    components: ComponentStore,
    tags: BTreeSet<String>,
    in_world: bool,
}

impl Entity {
    pub fn new(position: Point) -> Self {
        Self::with_id(EntityId::generate(), position)
    }

    pub fn with_id(id: EntityId, position: Point) -> Self {
        Self {
            id,
            position,
            components: ComponentStore::default(),
            tags: BTreeSet::new(),
            in_world: false,
        }
    }

    pub fn with_component(mut self, component: impl Into<Component>) -> Self {
        self.components.insert(component.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether the entity is currently registered with a world.
    pub fn in_world(&self) -> bool {
        self.in_world
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(kind)
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains(kind)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_player(&self) -> bool {
        self.has_tag(PLAYER_TAG)
    }

    pub fn is_opaque(&self) -> bool {
        self.has_component(ComponentKind::Opacity)
    }

    pub fn inertia(&self) -> Option<&Inertia> {
        match self.component(ComponentKind::Inertia) {
            Some(Component::Inertia(inertia)) => Some(inertia),
            _ => None,
        }
    }

    pub fn buffered_move(&self) -> Option<&BufferedMove> {
        match self.component(ComponentKind::BufferedMove) {
            Some(Component::BufferedMove(buffered)) => Some(buffered),
            _ => None,
        }
    }

    pub fn vision(&self) -> Option<&Vision> {
        match self.component(ComponentKind::Vision) {
            Some(Component::Vision(vision)) => Some(vision),
            _ => None,
        }
    }

    pub fn wall(&self) -> Option<&Wall> {
        match self.component(ComponentKind::Wall) {
            Some(Component::Wall(wall)) => Some(wall),
            _ => None,
        }
    }

    pub fn cooldown(&self) -> Option<&Cooldown> {
        match self.component(ComponentKind::Cooldown) {
            Some(Component::Cooldown(cooldown)) => Some(cooldown),
            _ => None,
        }
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        match self.component(ComponentKind::Metrics) {
            Some(Component::Metrics(metrics)) => Some(metrics),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self.component(ComponentKind::Symbol) {
            Some(Component::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn enemy_ai(&self) -> Option<&EnemyAi> {
        match self.component(ComponentKind::EnemyAi) {
            Some(Component::EnemyAi(ai)) => Some(ai),
            _ => None,
        }
    }

    pub fn follower(&self) -> Option<&Follower> {
        match self.component(ComponentKind::Follower) {
            Some(Component::Follower(follower)) => Some(follower),
            _ => None,
        }
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_in_world(&mut self, in_world: bool) {
        self.in_world = in_world;
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    pub(crate) fn insert_tag(&mut self, tag: String) -> bool {
        self.tags.insert(tag)
    }

    pub(crate) fn take_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }
}

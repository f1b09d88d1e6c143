//! Component data attached to entities.
//!
//! Components are a closed sum type: every concrete component is a variant of
//! [`Component`] and is identified by its [`ComponentKind`] tag. Call sites
//! match on the variant instead of downcasting, and an entity holds at most
//! one component per kind.
pub mod cooldown;
pub mod wall;

pub use cooldown::{Cooldown, CooldownState};
pub use wall::{Wall, WallEdge, WallProperties, WallSegment};

use crate::entity::EntityId;
use crate::geometry::{Direction, Point};

/// String tag identifying a component type.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComponentKind {
    Opacity,
    Wall,
    Impassable,
    Impathable,
    Vision,
    Inertia,
    BufferedMove,
    Brake,
    Turbo,
    Cooldown,
    Metrics,
    Symbol,
    EnemyAi,
    Follower,
}

impl ComponentKind {
    /// Kinds whose changes alter the field-of-view map.
    pub fn affects_fov(self) -> bool {
        matches!(self, ComponentKind::Opacity | ComponentKind::Wall)
    }
}

/// Observer settings used when computing what an entity can see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vision {
    pub radius: u32,
    /// Skip line-of-sight and see the full square radius.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignore_opacity: bool,
}

impl Vision {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            ignore_opacity: false,
        }
    }
}

/// Current momentum of a mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inertia {
    pub direction: Direction,
    pub magnitude: u32,
}

impl Inertia {
    pub fn new(direction: Direction, magnitude: u32) -> Self {
        Self {
            direction,
            magnitude,
        }
    }
}

/// Directional input queued for the next movement resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferedMove {
    pub direction: Direction,
    /// The key was released before the tick resolved (a tap, not a hold).
    #[cfg_attr(feature = "serde", serde(default))]
    pub key_up: bool,
}

impl BufferedMove {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            key_up: false,
        }
    }

    pub fn tap(direction: Direction) -> Self {
        Self {
            direction,
            key_up: true,
        }
    }
}

/// Movement statistics kept for the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Metrics {
    pub tiles_traveled: u32,
    pub drift_distance: u32,
    pub collisions: u32,
}

/// Rendering hint. The core never reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub glyph: char,
    pub foreground: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub background: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub z_index: i32,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyAiKind {
    /// Paths towards the player once it is in sight.
    #[default]
    Chaser,
    /// Never moves.
    Stationary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAi {
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: EnemyAiKind,
    pub aggro_radius: u32,
}

/// Trails a leader by stepping onto the tile it just left.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Follower {
    pub leader: EntityId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_leader_position: Option<Point>,
}

/// Every component an entity can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Component {
    Opacity,
    Wall(Wall),
    Impassable,
    Impathable,
    Vision(Vision),
    Inertia(Inertia),
    BufferedMove(BufferedMove),
    Brake,
    Turbo,
    Cooldown(Cooldown),
    Metrics(Metrics),
    Symbol(Symbol),
    EnemyAi(EnemyAi),
    Follower(Follower),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Opacity => ComponentKind::Opacity,
            Component::Wall(_) => ComponentKind::Wall,
            Component::Impassable => ComponentKind::Impassable,
            Component::Impathable => ComponentKind::Impathable,
            Component::Vision(_) => ComponentKind::Vision,
            Component::Inertia(_) => ComponentKind::Inertia,
            Component::BufferedMove(_) => ComponentKind::BufferedMove,
            Component::Brake => ComponentKind::Brake,
            Component::Turbo => ComponentKind::Turbo,
            Component::Cooldown(_) => ComponentKind::Cooldown,
            Component::Metrics(_) => ComponentKind::Metrics,
            Component::Symbol(_) => ComponentKind::Symbol,
            Component::EnemyAi(_) => ComponentKind::EnemyAi,
            Component::Follower(_) => ComponentKind::Follower,
        }
    }
}

macro_rules! impl_from_component {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$ty(value)
                }
            }
        )+
    };
}

impl_from_component!(
    Wall,
    Vision,
    Inertia,
    BufferedMove,
    Cooldown,
    Metrics,
    Symbol,
    EnemyAi,
    Follower,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_snake_case() {
        assert_eq!(ComponentKind::BufferedMove.to_string(), "buffered_move");
        assert_eq!(
            "enemy_ai".parse::<ComponentKind>().ok(),
            Some(ComponentKind::EnemyAi)
        );
        assert_eq!(
            Component::from(Inertia::new(Direction::East, 2)).kind(),
            ComponentKind::Inertia
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn components_serialize_with_type_tag() {
        let json = serde_json::to_value(Component::from(Inertia::new(Direction::East, 3)))
            .expect("serialize inertia");
        assert_eq!(
            json,
            serde_json::json!({"type": "inertia", "direction": "east", "magnitude": 3})
        );

        let marker: Component =
            serde_json::from_str(r#"{"type":"impassable"}"#).expect("parse marker");
        assert_eq!(marker, Component::Impassable);

        let vision: Component =
            serde_json::from_str(r#"{"type":"vision","radius":6}"#).expect("parse vision");
        assert_eq!(vision, Component::Vision(Vision::new(6)));
    }
}

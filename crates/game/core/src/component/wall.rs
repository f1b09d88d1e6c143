use bitflags::bitflags;

use crate::geometry::{Direction, Point};

bitflags! {
    /// Properties of a single wall segment.
    ///
    /// Bit 0 is purely visual, bit 1 blocks line of sight and bit 2 blocks
    /// movement. Any combination is valid, e.g. a window is `RENDER | IMPASSABLE`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WallProperties: u8 {
        const RENDER     = 1 << 0;
        const OPAQUE     = 1 << 1;
        const IMPASSABLE = 1 << 2;
    }
}

impl WallProperties {
    /// A solid wall: drawn, blocks sight and movement.
    pub const SOLID: Self = Self::RENDER.union(Self::OPAQUE).union(Self::IMPASSABLE);
}

/// One wall segment on the edge of a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallSegment {
    pub properties: WallProperties,
    pub color: String,
}

impl WallSegment {
    pub fn new(properties: WallProperties, color: impl Into<String>) -> Self {
        Self {
            properties,
            color: color.into(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.properties.contains(WallProperties::OPAQUE)
    }

    pub fn is_impassable(&self) -> bool {
        self.properties.contains(WallProperties::IMPASSABLE)
    }
}

/// Edge of a tile that owns wall storage.
///
/// Walls on the south and east edges are stored on the neighbouring tile as
/// its north and west edges, so every physical wall has exactly one owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WallEdge {
    North,
    West,
}

impl WallEdge {
    /// Translates a directional request relative to a tile into the owning
    /// edge and the offset of the tile that owns it.
    pub const fn canonical(direction: Direction) -> (WallEdge, (i32, i32)) {
        match direction {
            Direction::North => (WallEdge::North, (0, 0)),
            Direction::West => (WallEdge::West, (0, 0)),
            Direction::South => (WallEdge::North, (0, 1)),
            Direction::East => (WallEdge::West, (1, 0)),
        }
    }

    /// Owning tile and edge of the wall separating two orthogonally adjacent
    /// tiles. `None` when the tiles are not orthogonal neighbours.
    pub fn between(from: Point, to: Point) -> Option<(Point, WallEdge)> {
        let direction = Direction::between(from, to)?;
        let (edge, (dx, dy)) = Self::canonical(direction);
        Some((from.offset(dx, dy), edge))
    }
}

impl From<WallEdge> for Direction {
    fn from(edge: WallEdge) -> Self {
        match edge {
            WallEdge::North => Direction::North,
            WallEdge::West => Direction::West,
        }
    }
}

/// Wall segments owned by a tile.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wall {
    #[cfg_attr(feature = "serde", serde(default))]
    pub north: Option<WallSegment>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub west: Option<WallSegment>,
}

impl Wall {
    pub fn segment(&self, edge: WallEdge) -> Option<&WallSegment> {
        match edge {
            WallEdge::North => self.north.as_ref(),
            WallEdge::West => self.west.as_ref(),
        }
    }

    pub fn set_segment(&mut self, edge: WallEdge, segment: Option<WallSegment>) {
        match edge {
            WallEdge::North => self.north = segment,
            WallEdge::West => self.west = segment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.north.is_none() && self.west.is_none()
    }

    /// Iterates over the edges carrying an opaque segment.
    pub fn opaque_edges(&self) -> impl Iterator<Item = WallEdge> + '_ {
        [WallEdge::North, WallEdge::West]
            .into_iter()
            .filter(|edge| self.segment(*edge).is_some_and(WallSegment::is_opaque))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn south_and_east_map_to_neighbour_edges() {
        assert_eq!(
            WallEdge::canonical(Direction::South),
            (WallEdge::North, (0, 1))
        );
        assert_eq!(WallEdge::canonical(Direction::East), (WallEdge::West, (1, 0)));
        assert_eq!(
            WallEdge::canonical(Direction::North),
            (WallEdge::North, (0, 0))
        );
    }

    #[test]
    fn edge_between_neighbours_is_shared() {
        let a = Point::new(2, 2);
        let below = Point::new(2, 3);
        assert_eq!(WallEdge::between(a, below), Some((below, WallEdge::North)));
        assert_eq!(WallEdge::between(below, a), Some((below, WallEdge::North)));
        assert_eq!(WallEdge::between(a, Point::new(3, 3)), None);
    }

    #[test]
    fn opaque_edges_skip_see_through_segments() {
        let wall = Wall {
            north: Some(WallSegment::new(WallProperties::SOLID, "#888")),
            west: Some(WallSegment::new(
                WallProperties::RENDER | WallProperties::IMPASSABLE,
                "#44f",
            )),
        };
        let edges: Vec<_> = wall.opaque_edges().collect();
        assert_eq!(edges, vec![WallEdge::North]);
        assert!(wall.west.as_ref().is_some_and(WallSegment::is_impassable));
    }
}

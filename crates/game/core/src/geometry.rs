use std::fmt;
use std::ops::Add;

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev(self, other: Point) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// Formats as the `"x,y"` key used by the spatial index.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Orthogonal direction on the grid. North points towards y - 1.
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
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        self != other && !self.is_opposite(other)
    }

    /// Direction of an orthogonal unit step, `None` for anything else.
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_direction_steps_one_tile() {
        let origin = Point::new(3, 3);
        assert_eq!(origin + Direction::North, Point::new(3, 2));
        assert_eq!(origin + Direction::South, Point::new(3, 4));
        assert_eq!(origin + Direction::East, Point::new(4, 3));
        assert_eq!(origin + Direction::West, Point::new(2, 3));
    }

    #[test]
    fn direction_relationships() {
        assert!(Direction::North.is_opposite(Direction::South));
        assert!(Direction::East.is_perpendicular(Direction::North));
        assert!(!Direction::East.is_perpendicular(Direction::West));
        assert!(!Direction::East.is_perpendicular(Direction::East));
    }

    #[test]
    fn between_only_accepts_unit_steps() {
        let from = Point::new(1, 1);
        assert_eq!(Direction::between(from, Point::new(1, 0)), Some(Direction::North));
        assert_eq!(Direction::between(from, Point::new(2, 2)), None);
        assert_eq!(Direction::between(from, from), None);
    }

    #[test]
    fn point_displays_as_spatial_key() {
        assert_eq!(Point::new(4, -2).to_string(), "4,-2");
        assert_eq!("west".parse::<Direction>().ok(), Some(Direction::West));
    }
}

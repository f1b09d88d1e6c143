//! Line-of-sight occupancy grid and field-of-view computation.
//!
//! [`FieldOfViewMap`] only knows about opaque bodies and opaque wall edges;
//! it has no notion of entities. The world keeps it in sync and calls
//! [`compute_field_of_view`] for observers.
use std::collections::{BTreeSet, HashSet};

use crate::component::WallEdge;
use crate::geometry::{Direction, Point};

/// Opaque bodies and directional walls on a fixed-size grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOfViewMap {
    width: i32,
    height: i32,
    bodies: HashSet<Point>,
    walls: HashSet<(Point, WallEdge)>,
}

impl FieldOfViewMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bodies: HashSet::new(),
            walls: HashSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width && point.y < self.height
    }

    pub fn add_body(&mut self, x: i32, y: i32) {
        self.bodies.insert(Point::new(x, y));
    }

    pub fn remove_body(&mut self, x: i32, y: i32) {
        self.bodies.remove(&Point::new(x, y));
    }

    pub fn has_body(&self, point: Point) -> bool {
        self.bodies.contains(&point)
    }

    pub fn add_wall(&mut self, x: i32, y: i32, direction: Direction) {
        self.walls.insert(canonical_wall(x, y, direction));
    }

    pub fn remove_wall(&mut self, x: i32, y: i32, direction: Direction) {
        self.walls.remove(&canonical_wall(x, y, direction));
    }

    pub fn has_wall(&self, x: i32, y: i32, direction: Direction) -> bool {
        self.walls.contains(&canonical_wall(x, y, direction))
    }

    /// Drops every body and wall owned by a single tile.
    pub fn clear_tile(&mut self, point: Point) {
        self.bodies.remove(&point);
        self.walls.remove(&(point, WallEdge::North));
        self.walls.remove(&(point, WallEdge::West));
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.walls.clear();
    }

    fn blocks_step(&self, from: Point, to: Point) -> bool {
        WallEdge::between(from, to).is_some_and(|wall| self.walls.contains(&wall))
    }

    /// Whether sight passes from `from` into the adjacent tile `to`.
    ///
    /// A diagonal step is open when either orthogonal detour is open: both of
    /// its edges are wall-free and the corner tile is not a body.
    fn step_open(&self, from: Point, to: Point) -> bool {
        if from.x == to.x || from.y == to.y {
            return !self.blocks_step(from, to);
        }

        [Point::new(to.x, from.y), Point::new(from.x, to.y)]
            .into_iter()
            .any(|corner| {
                !self.blocks_step(from, corner)
                    && !self.has_body(corner)
                    && !self.blocks_step(corner, to)
            })
    }
}

fn canonical_wall(x: i32, y: i32, direction: Direction) -> (Point, WallEdge) {
    let (edge, (dx, dy)) = WallEdge::canonical(direction);
    (Point::new(x + dx, y + dy), edge)
}

/// Result of a field-of-view computation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FieldOfView {
    visible: BTreeSet<Point>,
}

impl FieldOfView {
    pub fn is_visible(&self, point: Point) -> bool {
        self.visible.contains(&point)
    }

    pub fn visible(&self) -> impl Iterator<Item = Point> + '_ {
        self.visible.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn into_points(self) -> BTreeSet<Point> {
        self.visible
    }
}

/// Computes the tiles visible from `(x, y)` within a Euclidean `radius`.
///
/// Sight travels along the Bresenham line to each candidate tile. Opaque
/// bodies block the tiles behind them but are themselves visible.
pub fn compute_field_of_view(map: &FieldOfViewMap, x: i32, y: i32, radius: u32) -> FieldOfView {
    let origin = Point::new(x, y);
    let mut visible = BTreeSet::new();
    if !map.contains(origin) {
        return FieldOfView { visible };
    }
    visible.insert(origin);

    let r = i32::try_from(radius).unwrap_or(i32::MAX / 2);
    let r_squared = i64::from(r) * i64::from(r);

    for ty in (y - r).max(0)..=(y + r).min(map.height - 1) {
        for tx in (x - r).max(0)..=(x + r).min(map.width - 1) {
            let target = Point::new(tx, ty);
            let (dx, dy) = (i64::from(tx - x), i64::from(ty - y));
            if target == origin || dx * dx + dy * dy > r_squared {
                continue;
            }
            if line_is_clear(map, origin, target) {
                visible.insert(target);
            }
        }
    }

    FieldOfView { visible }
}

fn line_is_clear(map: &FieldOfViewMap, origin: Point, target: Point) -> bool {
    let line = bresenham(origin, target);
    line.windows(2).all(|pair| {
        let (from, to) = (pair[0], pair[1]);
        (from == origin || !map.has_body(from)) && map.step_open(from, to)
    })
}

fn bresenham(from: Point, to: Point) -> Vec<Point> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut points = vec![current];

    while current != to {
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            current.x += sx;
        }
        if doubled <= dx {
            err += dx;
            current.y += sy;
        }
        points.push(current);
    }

    points
}

//! Grid A* search.
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::geometry::Point;

use super::World;

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Distance estimate guiding [`World::find_path_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Every node scores 1: a uniform-cost search. Used by [`World::find_path`].
    #[default]
    Constant,
    /// Octile distance; admissible for unit-cost diagonal moves.
    Octile,
}

impl Heuristic {
    fn estimate(self, from: Point, to: Point) -> u32 {
        match self {
            Heuristic::Constant => 1,
            Heuristic::Octile => from.chebyshev(to),
        }
    }
}

impl World {
    /// Shortest path from `start` to `end`, both inclusive.
    ///
    /// Every step costs 1, diagonal or not. The start tile is never checked
    /// and the end tile ignores the entities standing on it, so a search can
    /// leave an occupied tile and target an occupied one. Diagonal steps
    /// require both orthogonal neighbours to be passable.
    pub fn find_path(&self, start: Point, end: Point, allow_diagonal: bool) -> Option<Vec<Point>> {
        self.find_path_with(start, end, allow_diagonal, Heuristic::Constant)
    }

    pub fn find_path_with(
        &self,
        start: Point,
        end: Point,
        allow_diagonal: bool,
        heuristic: Heuristic,
    ) -> Option<Vec<Point>> {
        if !self.is_in_bounds(start) || !self.is_in_bounds(end) {
            return None;
        }
        if start == end {
            return Some(vec![start]);
        }

        let mut open = BinaryHeap::new();
        let mut g_score: BTreeMap<Point, u32> = BTreeMap::new();
        let mut came_from: BTreeMap<Point, Point> = BTreeMap::new();
        let mut closed: BTreeSet<Point> = BTreeSet::new();
        let mut seq: u64 = 0;

        g_score.insert(start, 0);
        open.push(Reverse((heuristic.estimate(start, end), seq, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if current == end {
                return Some(reconstruct(&came_from, end));
            }
            if !closed.insert(current) {
                continue;
            }
            let current_g = g_score.get(&current).copied().unwrap_or(u32::MAX);

            for next in self.path_neighbours(current, end, allow_diagonal) {
                if closed.contains(&next) {
                    continue;
                }
                let tentative = current_g.saturating_add(1);
                if g_score.get(&next).is_some_and(|known| *known <= tentative) {
                    continue;
                }
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                seq += 1;
                let f = tentative.saturating_add(heuristic.estimate(next, end));
                open.push(Reverse((f, seq, next)));
            }
        }

        tracing::trace!(%start, %end, "no path");
        None
    }

    fn path_neighbours(&self, current: Point, end: Point, allow_diagonal: bool) -> Vec<Point> {
        let mut neighbours: Vec<Point> = ORTHOGONAL
            .iter()
            .map(|(dx, dy)| current.offset(*dx, *dy))
            .filter(|next| self.path_step_open(current, *next, end))
            .collect();

        if allow_diagonal {
            neighbours.extend(
                DIAGONAL
                    .iter()
                    .map(|(dx, dy)| current.offset(*dx, *dy))
                    .filter(|next| {
                        let corners = [Point::new(next.x, current.y), Point::new(current.x, next.y)];
                        corners.iter().all(|corner| {
                            self.path_step_open(current, *corner, end)
                                && self.path_step_open(*corner, *next, end)
                        })
                    }),
            );
        }
        neighbours
    }

    /// Orthogonal step check used by the pathfinder. The end tile skips the
    /// entity check but still respects walls.
    fn path_step_open(&self, from: Point, to: Point, end: Point) -> bool {
        if !self.is_in_bounds(to) || self.step_crosses_wall(from, to) {
            return false;
        }
        to == end || self.tile_admits(to, false)
    }
}

fn reconstruct(came_from: &BTreeMap<Point, Point>, end: Point) -> Vec<Point> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from.get(&current) {
        path.push(*previous);
        current = *previous;
    }
    path.reverse();
    path
}

//! Grid bounds and obstacle mask

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Fixed-size board: dimensions plus the obstacle mask.
///
/// The obstacle set is immutable once setup completes; the sorted set keeps
/// iteration (and serialization) deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    obstacles: BTreeSet<Position>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            obstacles: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Out of bounds or obstructed; impassable for units
    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.in_bounds(pos) || self.is_obstacle(pos)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().copied()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub(crate) fn add_obstacle(&mut self, pos: Position) {
        debug_assert!(self.in_bounds(pos));
        self.obstacles.insert(pos);
    }
}

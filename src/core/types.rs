//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two competing players
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Both sides in resolution order (Blue acts before Red within a phase)
    pub const BOTH: [Side; 2] = [Side::Blue, Side::Red];

    pub fn opponent(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Stable array index for per-side storage
    pub fn index(&self) -> usize {
        match self {
            Side::Blue => 0,
            Side::Red => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Blue => "Blue",
            Side::Red => "Red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier for units
///
/// Ordering is (side, index), which is also the deterministic
/// resolution order within every turn phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitId {
    pub side: Side,
    pub index: u32,
}

impl UnitId {
    pub fn new(side: Side, index: u32) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            Side::Blue => 'b',
            Side::Red => 'r',
        };
        write!(f, "{}{}", prefix, self.index)
    }
}

/// Turn counter (1-based; the first resolved turn is turn 1)
pub type Turn = u32;

/// Integer grid position
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position one step in the given direction (may be out of bounds)
    pub fn step(&self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbors, in fixed direction order
    pub fn neighbors4(&self) -> [Position; 4] {
        [
            self.step(Direction::North),
            self.step(Direction::South),
            self.step(Direction::East),
            self.step(Direction::West),
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal movement/attack direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in fixed enumeration order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// Direction whose delta matches the sign of (dst - src), preferring
    /// the axis with the larger gap
    pub fn toward(src: Position, dst: Position) -> Option<Direction> {
        let dx = dst.x - src.x;
        let dy = dst.y - src.y;
        if dx == 0 && dy == 0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0 { Direction::East } else { Direction::West })
        } else {
            Some(if dy > 0 { Direction::North } else { Direction::South })
        }
    }
}

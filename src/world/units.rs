//! Units, bases, and per-side state

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Side, UnitId};
use crate::world::resources::Cargo;

/// A mobile, mortal combatant
///
/// Created at match start; never resurrected. Dead units keep their record
/// for end-of-match reporting but drop out of every "living" query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub position: Position,
    pub hp: u32,
    pub attack: u32,
    pub cargo: Cargo,
}

impl Unit {
    pub fn new(id: UnitId, position: Position, hp: u32, attack: u32) -> Self {
        Self {
            id,
            position,
            hp,
            attack,
            cargo: Cargo::empty(),
        }
    }

    pub fn side(&self) -> Side {
        self.id.side
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage with a floor at 0 HP; returns true on death
    pub(crate) fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.hp = self.hp.saturating_sub(amount);
        was_alive && self.hp == 0
    }
}

/// A side's stationary, destructible objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub side: Side,
    pub position: Position,
    pub hp: u32,
}

impl Base {
    pub fn new(side: Side, position: Position, hp: u32) -> Self {
        Self { side, position, hp }
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }

    /// Apply damage with a floor at 0 HP; returns true on destruction
    pub(crate) fn apply_damage(&mut self, amount: u32) -> bool {
        let was_standing = !self.is_destroyed();
        self.hp = self.hp.saturating_sub(amount);
        was_standing && self.is_destroyed()
    }
}

/// One side's base, accumulated score, and delivery tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub base: Base,
    pub score: u32,
    /// Count of resource units delivered to this base over the match
    pub delivered_resources: u32,
}

impl PlayerState {
    pub fn new(base: Base) -> Self {
        Self {
            base,
            score: 0,
            delivered_resources: 0,
        }
    }
}

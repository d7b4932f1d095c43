//! The authoritative game state aggregate
//!
//! Owned and mutated exclusively by the turn resolver: read queries are
//! public, the mutation surface is `pub(crate)`. Agents and observers only
//! ever see `&GameState`, so the borrow checker enforces the single-writer
//! rule the design calls for.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::MatchConfig;
use crate::core::types::{Position, Side, Turn, UnitId};
use crate::world::city::CitySite;
use crate::world::grid::Grid;
use crate::world::resources::ResourceKind;
use crate::world::units::{Base, PlayerState, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: MatchConfig,
    grid: Grid,
    units: BTreeMap<UnitId, Unit>,
    players: [PlayerState; 2],
    resources: BTreeMap<Position, ResourceKind>,
    cities: BTreeMap<Position, CitySite>,
    turn: Turn,
    /// Total resource units ever spawned (initial + respawns); lets the
    /// conservation invariant be checked at any point
    resources_spawned: u32,
}

impl GameState {
    pub(crate) fn new(
        config: MatchConfig,
        grid: Grid,
        units: BTreeMap<UnitId, Unit>,
        players: [PlayerState; 2],
        resources: BTreeMap<Position, ResourceKind>,
        cities: BTreeMap<Position, CitySite>,
    ) -> Self {
        let resources_spawned = resources.len() as u32;
        Self {
            config,
            grid,
            units,
            players,
            resources,
            cities,
            turn: 1,
            resources_spawned,
        }
    }

    // --- Read queries ---

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The turn about to be resolved (1-based)
    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// All unit records (dead included), in (side, index) order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Living units in deterministic resolution order
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(|u| u.is_alive())
    }

    pub fn living_units_of(&self, side: Side) -> impl Iterator<Item = &Unit> {
        self.living_units().filter(move |u| u.side() == side)
    }

    pub fn living_count(&self, side: Side) -> u32 {
        self.living_units_of(side).count() as u32
    }

    /// The living unit standing on `pos`, if any
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.living_units().find(|u| u.position == pos)
    }

    /// Point lookup table of living unit positions
    pub fn occupancy(&self) -> AHashMap<Position, UnitId> {
        self.living_units().map(|u| (u.position, u.id)).collect()
    }

    pub fn player(&self, side: Side) -> &PlayerState {
        &self.players[side.index()]
    }

    pub fn base(&self, side: Side) -> &Base {
        &self.players[side.index()].base
    }

    /// The still-standing base on `pos`, if any
    pub fn standing_base_at(&self, pos: Position) -> Option<&Base> {
        Side::BOTH
            .iter()
            .map(|side| self.base(*side))
            .find(|base| base.position == pos && !base.is_destroyed())
    }

    pub fn score(&self, side: Side) -> u32 {
        self.players[side.index()].score
    }

    pub fn scores(&self) -> [u32; 2] {
        [self.score(Side::Blue), self.score(Side::Red)]
    }

    /// Base HP plus living unit HP; the score tie-breaker
    pub fn total_hp(&self, side: Side) -> u32 {
        self.base(side).hp + self.living_units_of(side).map(|u| u.hp).sum::<u32>()
    }

    pub fn resource_at(&self, pos: Position) -> Option<ResourceKind> {
        self.resources.get(&pos).copied()
    }

    /// Remaining nodes in scanline order
    pub fn resources(&self) -> impl Iterator<Item = (Position, ResourceKind)> + '_ {
        self.resources.iter().map(|(p, k)| (*p, *k))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resources_spawned(&self) -> u32 {
        self.resources_spawned
    }

    pub fn city_at(&self, pos: Position) -> Option<&CitySite> {
        self.cities.get(&pos)
    }

    /// City sites in scanline order
    pub fn cities(&self) -> impl Iterator<Item = &CitySite> {
        self.cities.values()
    }

    pub fn has_cities(&self) -> bool {
        !self.cities.is_empty()
    }

    // --- Mutation surface (turn resolver only) ---

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub(crate) fn move_unit(&mut self, id: UnitId, to: Position) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = to;
        }
    }

    /// Returns true if the hit killed the unit
    pub(crate) fn damage_unit(&mut self, id: UnitId, amount: u32) -> bool {
        self.units
            .get_mut(&id)
            .map(|u| u.apply_damage(amount))
            .unwrap_or(false)
    }

    /// Returns true if the hit destroyed the base
    pub(crate) fn damage_base(&mut self, side: Side, amount: u32) -> bool {
        self.players[side.index()].base.apply_damage(amount)
    }

    pub(crate) fn take_resource(&mut self, pos: Position) -> Option<ResourceKind> {
        self.resources.remove(&pos)
    }

    pub(crate) fn spawn_resource(&mut self, pos: Position, kind: ResourceKind) {
        let previous = self.resources.insert(pos, kind);
        debug_assert!(previous.is_none(), "resource spawned onto occupied node");
        self.resources_spawned += 1;
    }

    pub(crate) fn city_mut(&mut self, pos: Position) -> Option<&mut CitySite> {
        self.cities.get_mut(&pos)
    }

    pub(crate) fn cities_mut(&mut self) -> impl Iterator<Item = &mut CitySite> {
        self.cities.values_mut()
    }

    pub(crate) fn add_score(&mut self, side: Side, points: u32) {
        self.players[side.index()].score += points;
    }

    pub(crate) fn record_delivery(&mut self, side: Side, resource_units: u32) {
        self.players[side.index()].delivered_resources += resource_units;
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    /// Post-resolution sanity check.
    ///
    /// A violation here is a resolver bug, not bad agent input, so it
    /// panics rather than being silently corrected.
    pub fn assert_invariants(&self) {
        let mut seen: AHashMap<Position, UnitId> = AHashMap::new();
        for unit in self.living_units() {
            assert!(
                self.grid.in_bounds(unit.position),
                "unit {} out of bounds at {}",
                unit.id,
                unit.position
            );
            assert!(
                !self.grid.is_obstacle(unit.position),
                "unit {} standing on an obstacle at {}",
                unit.id,
                unit.position
            );
            if let Some(other) = seen.insert(unit.position, unit.id) {
                panic!(
                    "units {} and {} share cell {}",
                    other, unit.id, unit.position
                );
            }
        }

        let carried: u32 = self.units().map(|u| u32::from(u.cargo.total())).sum();
        let delivered: u32 = self.players.iter().map(|p| p.delivered_resources).sum();
        assert_eq!(
            self.resources_spawned,
            self.resources.len() as u32 + carried + delivered,
            "resource conservation violated"
        );
    }
}

//! Seeded board generation
//!
//! Every random draw comes from the single match RNG in a fixed sequence,
//! so identical seed + config always produces an identical board.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::MatchConfig;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{Position, Side, UnitId};
use crate::world::city::CitySite;
use crate::world::grid::Grid;
use crate::world::resources::ResourceKind;
use crate::world::state::GameState;
use crate::world::units::{Base, PlayerState, Unit};

/// Build the initial game state for one match
pub fn build_match_state(config: &MatchConfig, rng: &mut ChaCha8Rng) -> Result<GameState> {
    config.validate()?;

    let mut grid = Grid::new(config.width, config.height);
    let blue_base = Base::new(Side::Blue, Position::new(0, 0), config.base_hp);
    let red_base = Base::new(
        Side::Red,
        Position::new(config.width - 1, config.height - 1),
        config.base_hp,
    );

    let mut taken: AHashSet<Position> = AHashSet::new();
    taken.insert(blue_base.position);
    taken.insert(red_base.position);

    // Squads deploy on the nearest free ring around their base
    let mut units = BTreeMap::new();
    for (side, base) in [(Side::Blue, &blue_base), (Side::Red, &red_base)] {
        let cells = spawn_positions(base.position, &grid, &taken, config.units_per_side as usize)?;
        for (index, pos) in cells.into_iter().enumerate() {
            let id = UnitId::new(side, index as u32);
            units.insert(id, Unit::new(id, pos, config.unit_hp, config.unit_attack));
            taken.insert(pos);
        }
    }

    for _ in 0..config.obstacle_count {
        let pos = sample_free_cell(config, rng, &taken)?;
        grid.add_obstacle(pos);
        taken.insert(pos);
    }

    let mut resources = BTreeMap::new();
    for _ in 0..config.resource_spawn_count {
        let pos = sample_free_cell(config, rng, &taken)?;
        let kind = ResourceKind::ALL[rng.gen_range(0..ResourceKind::ALL.len())];
        resources.insert(pos, kind);
        taken.insert(pos);
    }

    let mut cities = BTreeMap::new();
    for _ in 0..config.city_count {
        let pos = sample_free_cell(config, rng, &taken)?;
        cities.insert(pos, CitySite::new(pos));
        taken.insert(pos);
    }

    let players = [PlayerState::new(blue_base), PlayerState::new(red_base)];
    let state = GameState::new(config.clone(), grid, units, players, resources, cities);
    state.assert_invariants();
    Ok(state)
}

/// Pick a uniformly random cell not yet taken.
///
/// The config validator guarantees enough free cells exist; the attempt cap
/// only guards against a pathological near-full board.
pub(crate) fn sample_free_cell(
    config: &MatchConfig,
    rng: &mut ChaCha8Rng,
    taken: &AHashSet<Position>,
) -> Result<Position> {
    let max_attempts = config.cell_count().saturating_mul(64).max(1024);
    for _ in 0..max_attempts {
        let pos = Position::new(
            rng.gen_range(0..config.width),
            rng.gen_range(0..config.height),
        );
        if !taken.contains(&pos) {
            return Ok(pos);
        }
    }
    Err(ArenaError::Setup(
        "could not find a free cell for placement".into(),
    ))
}

/// Deterministic deployment cells: walk outward ring by ring from the base,
/// taking free in-bounds cells in sorted order.
fn spawn_positions(
    base: Position,
    grid: &Grid,
    taken: &AHashSet<Position>,
    count: usize,
) -> Result<Vec<Position>> {
    let mut cells = Vec::with_capacity(count);
    let max_radius = grid.width() + grid.height();
    'rings: for radius in 1..=max_radius {
        let mut ring = Vec::new();
        for dx in -radius..=radius {
            let rem = radius - dx.abs();
            for dy in if rem == 0 { vec![0] } else { vec![rem, -rem] } {
                let pos = Position::new(base.x + dx, base.y + dy);
                if grid.in_bounds(pos) && !taken.contains(&pos) {
                    ring.push(pos);
                }
            }
        }
        ring.sort();
        for pos in ring {
            cells.push(pos);
            if cells.len() == count {
                break 'rings;
            }
        }
    }
    if cells.len() < count {
        return Err(ArenaError::Setup(format!(
            "no room to deploy {} units around base at {}",
            count, base
        )));
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn build(seed: u64, config: &MatchConfig) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        build_match_state(config, &mut rng).unwrap()
    }

    #[test]
    fn test_setup_counts_match_config() {
        let config = MatchConfig::world();
        let state = build(7, &config);
        assert_eq!(state.grid().obstacle_count(), config.obstacle_count);
        assert_eq!(state.resource_count(), config.resource_spawn_count);
        assert_eq!(state.cities().count(), config.city_count);
        assert_eq!(
            state.living_count(Side::Blue),
            config.units_per_side
        );
        assert_eq!(state.living_count(Side::Red), config.units_per_side);
    }

    #[test]
    fn test_setup_is_deterministic() {
        let config = MatchConfig::classic();
        assert_eq!(build(42, &config), build(42, &config));
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = MatchConfig::classic();
        assert_ne!(build(1, &config), build(2, &config));
    }

    #[test]
    fn test_units_deploy_near_their_base() {
        let config = MatchConfig::world();
        let state = build(9, &config);
        for side in Side::BOTH {
            let base = state.base(side).position;
            for unit in state.living_units_of(side) {
                assert!(unit.position.manhattan_distance(&base) <= 3);
            }
        }
    }

    #[test]
    fn test_bad_config_rejected_before_setup() {
        let mut config = MatchConfig::classic();
        config.max_turns = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(build_match_state(&config, &mut rng).is_err());
    }
}

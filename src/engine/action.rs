//! Actions and the legality check
//!
//! Illegal or malformed actions are never an error: they degrade to `Idle`
//! so a misbehaving agent cannot crash the match. `validate_action` is the
//! single, pure place that policy lives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, UnitId};
use crate::world::state::GameState;

/// One unit's intent for the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Action {
    #[default]
    Idle,
    Move(Direction),
    Attack(Direction),
    Harvest,
    Deliver,
    Stabilize,
    Pacify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Idle => f.write_str("idle"),
            Action::Move(dir) => write!(f, "move {:?}", dir),
            Action::Attack(dir) => write!(f, "attack {:?}", dir),
            Action::Harvest => f.write_str("harvest"),
            Action::Deliver => f.write_str("deliver"),
            Action::Stabilize => f.write_str("stabilize"),
            Action::Pacify => f.write_str("pacify"),
        }
    }
}

/// Check a proposed action against the pre-turn state, downgrading anything
/// illegal to `Idle`.
///
/// Unit occupancy of a move target is deliberately NOT checked here: cells
/// empty out and fill up as the movement phase walks units in order, so the
/// phase itself holds the live occupancy check. Static constraints (bounds,
/// obstacles, the enemy base cell) are decided here.
pub fn validate_action(state: &GameState, unit_id: UnitId, action: Action) -> Action {
    let Some(unit) = state.unit(unit_id) else {
        return Action::Idle;
    };
    if !unit.is_alive() {
        return Action::Idle;
    }

    let legal = match action {
        Action::Idle => true,
        Action::Move(dir) => {
            let target = unit.position.step(dir);
            !state.grid().is_blocked(target)
                && state
                    .standing_base_at(target)
                    .map(|b| b.side == unit.side())
                    .unwrap_or(true)
        }
        Action::Attack(dir) => {
            let target = unit.position.step(dir);
            let enemy_unit = state
                .unit_at(target)
                .map(|u| u.side() != unit.side())
                .unwrap_or(false);
            let enemy_base = state
                .standing_base_at(target)
                .map(|b| b.side != unit.side())
                .unwrap_or(false);
            enemy_unit || enemy_base
        }
        Action::Harvest => {
            state.resource_at(unit.position).is_some()
                && unit.cargo.total() < state.config().carry_capacity
        }
        Action::Deliver => {
            unit.position == state.base(unit.side()).position && !unit.cargo.is_empty()
        }
        Action::Stabilize => state
            .city_at(unit.position)
            .map(|c| c.permits_stabilize(unit.side()))
            .unwrap_or(false),
        Action::Pacify => state
            .city_at(unit.position)
            .map(|c| c.permits_pacify(unit.side()))
            .unwrap_or(false),
    };

    if legal {
        action
    } else {
        Action::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::core::types::Side;
    use crate::world::setup::build_match_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_state(seed: u64) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        build_match_state(&MatchConfig::world(), &mut rng).unwrap()
    }

    fn any_living(state: &GameState, side: Side) -> UnitId {
        state.living_units_of(side).next().unwrap().id
    }

    #[test]
    fn test_unknown_unit_idles() {
        let state = world_state(3);
        let ghost = UnitId::new(Side::Blue, 99);
        assert_eq!(validate_action(&state, ghost, Action::Harvest), Action::Idle);
    }

    #[test]
    fn test_harvest_requires_node_underfoot() {
        let state = world_state(3);
        let id = any_living(&state, Side::Blue);
        let on_node = state
            .resource_at(state.unit(id).unwrap().position)
            .is_some();
        let validated = validate_action(&state, id, Action::Harvest);
        if on_node {
            assert_eq!(validated, Action::Harvest);
        } else {
            assert_eq!(validated, Action::Idle);
        }
    }

    #[test]
    fn test_deliver_requires_cargo_at_own_base() {
        let state = world_state(3);
        let id = any_living(&state, Side::Blue);
        // Fresh units carry nothing, so deliver is always illegal here
        assert_eq!(validate_action(&state, id, Action::Deliver), Action::Idle);
    }

    #[test]
    fn test_attack_requires_adjacent_enemy() {
        let state = world_state(3);
        let id = any_living(&state, Side::Blue);
        let unit = state.unit(id).unwrap();
        for dir in Direction::ALL {
            let target = unit.position.step(dir);
            let has_enemy = state
                .unit_at(target)
                .map(|u| u.side() == Side::Red)
                .unwrap_or(false)
                || state
                    .standing_base_at(target)
                    .map(|b| b.side == Side::Red)
                    .unwrap_or(false);
            let validated = validate_action(&state, id, Action::Attack(dir));
            assert_eq!(validated != Action::Idle, has_enemy);
        }
    }

    #[test]
    fn test_move_into_obstacle_idles() {
        let state = world_state(3);
        for unit in state.living_units() {
            for dir in Direction::ALL {
                let target = unit.position.step(dir);
                if state.grid().is_blocked(target) {
                    assert_eq!(
                        validate_action(&state, unit.id, Action::Move(dir)),
                        Action::Idle
                    );
                }
            }
        }
    }

    #[test]
    fn test_stabilize_off_city_idles() {
        let state = world_state(3);
        for unit in state.living_units() {
            if state.city_at(unit.position).is_none() {
                assert_eq!(
                    validate_action(&state, unit.id, Action::Stabilize),
                    Action::Idle
                );
                assert_eq!(
                    validate_action(&state, unit.id, Action::Pacify),
                    Action::Idle
                );
            }
        }
    }
}

//! The agent boundary
//!
//! An agent sees a read-only snapshot and returns one action per living
//! unit of its side. Units it omits idle. The engine re-validates every
//! submission, so a policy can be sloppy without crashing the match.

use ahash::AHashMap;

use crate::core::types::{Direction, Side, UnitId};
use crate::engine::action::{validate_action, Action};
use crate::world::state::GameState;
use crate::world::units::Unit;

/// One side's submitted actions for a turn
pub type ActionMap = AHashMap<UnitId, Action>;

pub trait AgentPolicy {
    /// Choose an action for each living unit of `side`.
    ///
    /// Must not depend on anything but the snapshot and the agent's own
    /// internal state (such as its RNG stream); both sides are invoked
    /// against the same snapshot before anything is applied.
    fn choose_actions(&mut self, state: &GameState, side: Side) -> ActionMap;

    fn name(&self) -> &str;
}

/// Enumerate the actions `unit` could legally take this turn, in a fixed
/// preference order: attacks, then deliver, harvest, city work, moves, and
/// always `Idle` last.
pub fn legal_candidates(state: &GameState, unit: &Unit) -> Vec<Action> {
    let mut candidates = Vec::with_capacity(12);
    for dir in Direction::ALL {
        candidates.push(Action::Attack(dir));
    }
    candidates.push(Action::Deliver);
    candidates.push(Action::Harvest);
    candidates.push(Action::Stabilize);
    candidates.push(Action::Pacify);
    for dir in Direction::ALL {
        // The validator leaves unit collisions to the movement phase; an
        // agent planning a move has no reason to bounce off standing units
        if state.unit_at(unit.position.step(dir)).is_none() {
            candidates.push(Action::Move(dir));
        }
    }

    let mut legal: Vec<Action> = candidates
        .into_iter()
        .filter(|&a| validate_action(state, unit.id, a) != Action::Idle)
        .collect();
    legal.push(Action::Idle);
    legal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::world::setup::build_match_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_candidates_always_include_idle() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let state = build_match_state(&MatchConfig::world(), &mut rng).unwrap();
        for unit in state.living_units() {
            let candidates = legal_candidates(&state, unit);
            assert_eq!(candidates.last(), Some(&Action::Idle));
        }
    }

    #[test]
    fn test_candidates_all_validate_clean() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let state = build_match_state(&MatchConfig::classic(), &mut rng).unwrap();
        for unit in state.living_units() {
            for action in legal_candidates(&state, unit) {
                assert_eq!(validate_action(&state, unit.id, action), action);
            }
        }
    }
}

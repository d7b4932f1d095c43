//! Uniformly random baseline agent

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agent::policy::{legal_candidates, ActionMap, AgentPolicy};
use crate::core::types::Side;
use crate::world::state::GameState;

/// Picks uniformly among each unit's legal actions. Useful as a baseline
/// opponent and for shaking out resolver edge cases.
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl AgentPolicy for RandomAgent {
    fn choose_actions(&mut self, state: &GameState, side: Side) -> ActionMap {
        let mut actions = ActionMap::default();
        for unit in state.living_units_of(side) {
            let candidates = legal_candidates(state, unit);
            let pick = candidates[self.rng.gen_range(0..candidates.len())];
            actions.insert(unit.id, pick);
        }
        actions
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::engine::action::validate_action;
    use crate::world::setup::build_match_state;

    #[test]
    fn test_covers_every_living_unit_with_legal_actions() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let state = build_match_state(&MatchConfig::world(), &mut rng).unwrap();
        let mut agent = RandomAgent::new(99);
        for side in Side::BOTH {
            let actions = agent.choose_actions(&state, side);
            assert_eq!(actions.len() as u32, state.living_count(side));
            for (&id, &action) in &actions {
                assert_eq!(validate_action(&state, id, action), action);
            }
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let state = build_match_state(&MatchConfig::classic(), &mut rng).unwrap();
        let a = RandomAgent::new(7).choose_actions(&state, Side::Blue);
        let b = RandomAgent::new(7).choose_actions(&state, Side::Blue);
        let mut a: Vec<_> = a.into_iter().collect();
        let mut b: Vec<_> = b.into_iter().collect();
        a.sort_by_key(|(id, _)| *id);
        b.sort_by_key(|(id, _)| *id);
        assert_eq!(a, b);
    }
}

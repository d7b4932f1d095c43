//! Victory evaluation and the tie-break chain
//!
//! Checked after every resolved turn: base destruction wins outright,
//! otherwise the turn limit ends the match on score, then total remaining
//! HP, then a declared draw. No randomness anywhere in the chain.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::Side;
use crate::world::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryReason {
    /// The losing side's base was destroyed
    BaseDestroyed,
    /// Turn limit reached; higher score wins
    Score,
    /// Scores tied at the limit; higher total remaining HP wins
    Attrition,
    /// Scores and HP both tied at the limit
    Draw,
}

impl fmt::Display for VictoryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VictoryReason::BaseDestroyed => "base destroyed",
            VictoryReason::Score => "score",
            VictoryReason::Attrition => "attrition",
            VictoryReason::Draw => "draw",
        };
        f.write_str(label)
    }
}

/// Terminal outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    pub winner: Option<Side>,
    pub reason: VictoryReason,
}

/// Evaluate the state for termination. `None` means the match continues.
///
/// Pure and idempotent: re-evaluating a terminal state returns the same
/// verdict.
pub fn evaluate(state: &GameState) -> Option<MatchVerdict> {
    let blue_down = state.base(Side::Blue).is_destroyed();
    let red_down = state.base(Side::Red).is_destroyed();

    match (blue_down, red_down) {
        (true, false) => {
            return Some(MatchVerdict {
                winner: Some(Side::Red),
                reason: VictoryReason::BaseDestroyed,
            })
        }
        (false, true) => {
            return Some(MatchVerdict {
                winner: Some(Side::Blue),
                reason: VictoryReason::BaseDestroyed,
            })
        }
        // Mutual destruction in one turn falls through to the score chain
        (true, true) => return Some(score_chain(state)),
        (false, false) => {}
    }

    if state.turn() > state.config().max_turns {
        return Some(score_chain(state));
    }
    None
}

fn score_chain(state: &GameState) -> MatchVerdict {
    let [blue_score, red_score] = state.scores();
    if blue_score != red_score {
        return MatchVerdict {
            winner: Some(if blue_score > red_score {
                Side::Blue
            } else {
                Side::Red
            }),
            reason: VictoryReason::Score,
        };
    }

    let blue_hp = state.total_hp(Side::Blue);
    let red_hp = state.total_hp(Side::Red);
    if blue_hp != red_hp {
        return MatchVerdict {
            winner: Some(if blue_hp > red_hp { Side::Blue } else { Side::Red }),
            reason: VictoryReason::Attrition,
        };
    }

    MatchVerdict {
        winner: None,
        reason: VictoryReason::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::world::setup::build_match_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fresh(config: &MatchConfig) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        build_match_state(config, &mut rng).unwrap()
    }

    #[test]
    fn test_fresh_match_is_not_terminal() {
        let state = fresh(&MatchConfig::classic());
        assert_eq!(evaluate(&state), None);
    }

    #[test]
    fn test_base_destruction_wins_immediately() {
        let config = MatchConfig::classic();
        let mut state = fresh(&config);
        state.damage_base(Side::Red, config.base_hp);
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, Some(Side::Blue));
        assert_eq!(verdict.reason, VictoryReason::BaseDestroyed);
    }

    #[test]
    fn test_base_destruction_beats_score() {
        let config = MatchConfig::classic();
        let mut state = fresh(&config);
        state.add_score(Side::Blue, 1000);
        state.damage_base(Side::Blue, config.base_hp);
        // Blue leads on points but lost its base
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, Some(Side::Red));
        assert_eq!(verdict.reason, VictoryReason::BaseDestroyed);
    }

    #[test]
    fn test_mutual_destruction_uses_score_chain() {
        let config = MatchConfig::classic();
        let mut state = fresh(&config);
        state.damage_base(Side::Blue, config.base_hp);
        state.damage_base(Side::Red, config.base_hp);
        state.add_score(Side::Red, 5);
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, Some(Side::Red));
        assert_eq!(verdict.reason, VictoryReason::Score);
    }

    #[test]
    fn test_turn_limit_score_then_hp_then_draw() {
        let config = MatchConfig::classic();

        // Score decides
        let mut state = fresh(&config);
        for _ in 0..config.max_turns {
            state.advance_turn();
        }
        state.add_score(Side::Blue, 3);
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, Some(Side::Blue));
        assert_eq!(verdict.reason, VictoryReason::Score);

        // Equal scores, HP decides
        let mut state = fresh(&config);
        for _ in 0..config.max_turns {
            state.advance_turn();
        }
        state.damage_base(Side::Red, 1);
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, Some(Side::Blue));
        assert_eq!(verdict.reason, VictoryReason::Attrition);

        // Symmetric board at the limit: a declared draw
        let mut state = fresh(&config);
        for _ in 0..config.max_turns {
            state.advance_turn();
        }
        let verdict = evaluate(&state).unwrap();
        assert_eq!(verdict.winner, None);
        assert_eq!(verdict.reason, VictoryReason::Draw);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let config = MatchConfig::classic();
        let mut state = fresh(&config);
        state.damage_base(Side::Red, config.base_hp);
        let first = evaluate(&state).unwrap();
        let second = evaluate(&state).unwrap();
        assert_eq!(first, second);
    }
}

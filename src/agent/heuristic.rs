//! Greedy rule-based agent
//!
//! Scores every legal candidate action one turn ahead using the tuning
//! weights from the match config and takes the best. Ties fall to the
//! candidate enumeration order (attacks before economy before movement),
//! so the policy is fully deterministic with no RNG of its own.

use ordered_float::OrderedFloat;

use crate::agent::policy::{legal_candidates, ActionMap, AgentPolicy};
use crate::core::config::HeuristicWeights;
use crate::core::types::{Position, Side, UnitId};
use crate::engine::action::Action;
use crate::world::city::CityControl;
use crate::world::state::GameState;
use crate::world::units::Unit;

pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentPolicy for HeuristicAgent {
    fn choose_actions(&mut self, state: &GameState, side: Side) -> ActionMap {
        let weights = &state.config().heuristic;
        let mut actions = ActionMap::default();
        for unit in state.living_units_of(side) {
            let mut best = Action::Idle;
            let mut best_score = f32::NEG_INFINITY;
            for candidate in legal_candidates(state, unit) {
                let score = score_candidate(state, weights, unit, candidate);
                // Strictly greater: earlier candidates win ties
                if OrderedFloat(score) > OrderedFloat(best_score) {
                    best = candidate;
                    best_score = score;
                }
            }
            actions.insert(unit.id, best);
        }
        actions
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

fn score_candidate(
    state: &GameState,
    weights: &HeuristicWeights,
    unit: &Unit,
    action: Action,
) -> f32 {
    let config = state.config();
    let mut score = match action {
        Action::Attack(dir) => {
            let target = unit.position.step(dir);
            if let Some(victim) = state.unit_at(target) {
                if victim.hp <= unit.attack {
                    weights.kill_reward
                } else {
                    weights.damage_reward * unit.attack as f32
                }
            } else if let Some(base) = state.standing_base_at(target) {
                let mut v = weights.damage_reward * unit.attack as f32;
                if base.hp <= unit.attack {
                    v += weights.kill_reward;
                }
                v
            } else {
                0.0
            }
        }
        Action::Deliver => {
            let mut points = unit.cargo.value(config);
            if unit.cargo.has_every_kind() {
                points += config.combo_bonus;
            }
            weights.delivery_weight * points as f32
        }
        Action::Harvest => {
            let value = state
                .resource_at(unit.position)
                .map(|k| k.value(config))
                .unwrap_or(0);
            weights.harvest_weight * value as f32
        }
        Action::Stabilize => {
            let completes = state
                .city_at(unit.position)
                .map(|c| match c.control {
                    CityControl::Neutral => config.capture_threshold <= 1,
                    CityControl::Stabilizing { owner, progress } => {
                        owner == unit.side() && progress + 1 >= config.capture_threshold
                    }
                    _ => false,
                })
                .unwrap_or(false);
            weights.stabilize_weight + if completes { weights.capture_bonus } else { 0.0 }
        }
        Action::Pacify => weights.pacify_weight,
        Action::Move(_) | Action::Idle => 0.0,
    };

    let post = match action {
        Action::Move(dir) => unit.position.step(dir),
        _ => unit.position,
    };
    let side = unit.side();
    let home = state.base(side).position;

    if let Some(objective) = pick_objective(state, weights, unit) {
        score += weights.objective_weight / (1.0 + post.manhattan_distance(&objective) as f32);
    }

    // Standing next to enemies is only worth it when the action pays
    let threat: u32 = state
        .living_units_of(side.opponent())
        .filter(|e| e.position.manhattan_distance(&post) <= weights.threat_radius)
        .map(|e| e.attack)
        .sum();
    score -= weights.risk_weight * threat as f32;

    if is_defender(unit.id, weights) && home_threatened(state, weights, side) {
        score += weights.defense_bias / (1.0 + post.manhattan_distance(&home) as f32);
    }

    score
}

/// Where this unit wants to be: home when loaded or hurt, otherwise the
/// nearest thing worth working, falling back to the enemy base.
fn pick_objective(
    state: &GameState,
    weights: &HeuristicWeights,
    unit: &Unit,
) -> Option<Position> {
    let side = unit.side();
    let home = state.base(side).position;

    let endangered = unit.hp <= weights.retreat_hp
        && state
            .living_units_of(side.opponent())
            .any(|e| e.position.manhattan_distance(&unit.position) <= weights.threat_radius);
    if !unit.cargo.is_empty() || endangered {
        return Some(home);
    }

    if let Some(target) = nearest(unit.position, state.resources().map(|(p, _)| p)) {
        return Some(target);
    }

    let workable_cities = state.cities().filter_map(|c| match c.control {
        CityControl::PeaceWindow { .. } => None,
        CityControl::Controlled { owner, .. } if owner == side => None,
        _ => Some(c.position),
    });
    if let Some(target) = nearest(unit.position, workable_cities) {
        return Some(target);
    }

    let enemy_base = state.base(side.opponent());
    if !enemy_base.is_destroyed() {
        // Can't stand on it; aim for it and the attack scoring takes over
        return Some(enemy_base.position);
    }
    None
}

fn nearest(from: Position, candidates: impl Iterator<Item = Position>) -> Option<Position> {
    candidates.min_by_key(|p| (from.manhattan_distance(p), *p))
}

fn is_defender(id: UnitId, weights: &HeuristicWeights) -> bool {
    id.index < weights.defender_count
}

fn home_threatened(state: &GameState, weights: &HeuristicWeights, side: Side) -> bool {
    let home = state.base(side).position;
    state
        .living_units_of(side.opponent())
        .any(|e| e.position.manhattan_distance(&home) <= weights.defense_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::core::types::Direction;
    use crate::engine::action::validate_action;
    use crate::world::setup::build_match_state;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_state(seed: u64) -> GameState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        build_match_state(&MatchConfig::world(), &mut rng).unwrap()
    }

    #[test]
    fn test_choices_are_legal_and_cover_all_units() {
        let state = world_state(17);
        let mut agent = HeuristicAgent::new();
        for side in Side::BOTH {
            let actions = agent.choose_actions(&state, side);
            assert_eq!(actions.len() as u32, state.living_count(side));
            for (&id, &action) in &actions {
                assert_eq!(validate_action(&state, id, action), action);
            }
        }
    }

    #[test]
    fn test_is_deterministic() {
        let state = world_state(17);
        let a = HeuristicAgent::new().choose_actions(&state, Side::Blue);
        let b = HeuristicAgent::new().choose_actions(&state, Side::Blue);
        assert_eq!(
            {
                let mut v: Vec<_> = a.into_iter().collect();
                v.sort_by_key(|(id, _)| *id);
                v
            },
            {
                let mut v: Vec<_> = b.into_iter().collect();
                v.sort_by_key(|(id, _)| *id);
                v
            }
        );
    }

    #[test]
    fn test_killing_blow_outscores_idling() {
        let state = world_state(17);
        let weights = &state.config().heuristic;
        for unit in state.living_units() {
            for dir in Direction::ALL {
                let target = unit.position.step(dir);
                if let Some(victim) = state.unit_at(target) {
                    if victim.side() != unit.side() && victim.hp <= unit.attack {
                        let kill = score_candidate(
                            &state,
                            weights,
                            unit,
                            Action::Attack(dir),
                        );
                        let idle = score_candidate(&state, weights, unit, Action::Idle);
                        assert!(kill > idle);
                    }
                }
            }
        }
    }

    #[test]
    fn test_loaded_unit_heads_home() {
        let state = world_state(23);
        let weights = &state.config().heuristic;
        let unit = state.living_units_of(Side::Blue).next().unwrap();
        let mut loaded = unit.clone();
        loaded.cargo.add(crate::world::resources::ResourceKind::Aid);
        let objective = pick_objective(&state, weights, &loaded).unwrap();
        assert_eq!(objective, state.base(Side::Blue).position);
    }
}

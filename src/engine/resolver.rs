//! Four-phase deterministic turn resolution
//!
//! Movement -> combat -> economy -> income, each phase walking the living
//! units in (side, unit-index) order. Given the same seed, configuration,
//! and submitted actions, resolution is fully reproducible.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::agent::policy::ActionMap;
use crate::core::types::{Position, Side, UnitId};
use crate::engine::action::{validate_action, Action};
use crate::engine::events::{MatchEvent, MatchEventKind};
use crate::world::city::{CityControl, CityTransition};
use crate::world::resources::ResourceKind;
use crate::world::setup::sample_free_cell;
use crate::world::state::GameState;

/// Resolve one full turn against both sides' submitted actions.
///
/// Returns the discrete events the turn produced. The RNG is only touched
/// by scheduled resource respawns.
pub fn resolve_turn(
    state: &mut GameState,
    submitted: &[ActionMap; 2],
    rng: &mut ChaCha8Rng,
) -> Vec<MatchEvent> {
    let turn = state.turn();
    let config = state.config().clone();
    let mut events = Vec::new();

    // Validate every submission against the frozen pre-turn state. Units
    // without a submitted action idle; unknown or dead ids are dropped.
    let mut plan: BTreeMap<UnitId, Action> = BTreeMap::new();
    let living: Vec<UnitId> = state.living_units().map(|u| u.id).collect();
    for id in living {
        let proposed = submitted[id.side.index()]
            .get(&id)
            .copied()
            .unwrap_or(Action::Idle);
        plan.insert(id, validate_action(state, id, proposed));
    }

    // --- Phase 1: movement ---
    // First mover (in plan order) wins a contested cell; a cell vacated
    // earlier in the phase is open to later movers.
    let mut occupancy = state.occupancy();
    for (&id, &action) in &plan {
        let Action::Move(dir) = action else { continue };
        let Some(unit) = state.unit(id) else { continue };
        let from = unit.position;
        let target = from.step(dir);
        if occupancy.contains_key(&target) {
            continue; // conflicting mover degrades to idle
        }
        if state
            .standing_base_at(target)
            .map(|b| b.side != id.side)
            .unwrap_or(false)
        {
            continue;
        }
        occupancy.remove(&from);
        occupancy.insert(target, id);
        state.move_unit(id, target);
    }

    // --- Phase 2: combat ---
    // A unit killed earlier in the phase is dead immediately: its own
    // queued attack (and any later-phase action) is dropped.
    for (&id, &action) in &plan {
        let Action::Attack(dir) = action else { continue };
        let Some(attacker) = state.unit(id) else { continue };
        if !attacker.is_alive() {
            continue;
        }
        let damage = attacker.attack;
        let target = attacker.position.step(dir);

        if let Some(victim) = state.unit_at(target).map(|u| u.id) {
            if victim.side != id.side && state.damage_unit(victim, damage) {
                state.add_score(id.side, config.kill_score);
                events.push(MatchEvent::new(
                    turn,
                    MatchEventKind::UnitKilled {
                        victim,
                        attacker: id,
                    },
                ));
            }
        } else if let Some(base_side) = state.standing_base_at(target).map(|b| b.side) {
            if base_side != id.side {
                events.push(MatchEvent::new(
                    turn,
                    MatchEventKind::BaseHit {
                        side: base_side,
                        attacker: id,
                        damage,
                    },
                ));
                if state.damage_base(base_side, damage) {
                    state.add_score(id.side, config.base_destroy_score);
                    events.push(MatchEvent::new(
                        turn,
                        MatchEventKind::BaseDestroyed {
                            side: base_side,
                            attacker: id,
                        },
                    ));
                }
            }
        }
    }

    // --- Phase 3: economy ---
    for (&id, &action) in &plan {
        let Some(unit) = state.unit(id) else { continue };
        if !unit.is_alive() {
            continue;
        }
        let pos = unit.position;
        let side = id.side;
        match action {
            Action::Harvest => {
                if unit.cargo.total() < config.carry_capacity {
                    if let Some(kind) = state.take_resource(pos) {
                        if let Some(unit) = state.unit_mut(id) {
                            unit.cargo.add(kind);
                        }
                        events.push(MatchEvent::new(
                            turn,
                            MatchEventKind::Harvested { unit: id, kind },
                        ));
                    }
                }
            }
            Action::Deliver => {
                if pos == state.base(side).position && !unit.cargo.is_empty() {
                    let cargo = match state.unit_mut(id) {
                        Some(unit) => unit.cargo.take(),
                        None => continue,
                    };
                    let combo = cargo.has_every_kind();
                    let mut points = cargo.value(&config);
                    if combo {
                        points += config.combo_bonus;
                    }
                    state.add_score(side, points);
                    state.record_delivery(side, u32::from(cargo.total()));
                    events.push(MatchEvent::new(
                        turn,
                        MatchEventKind::Delivered {
                            unit: id,
                            points,
                            combo,
                        },
                    ));
                }
            }
            Action::Stabilize => {
                if let Some(city) = state.city_mut(pos) {
                    if city.permits_stabilize(side) {
                        if let Some(CityTransition::Captured { by }) =
                            city.apply_stabilize(side, config.capture_threshold)
                        {
                            events.push(MatchEvent::new(
                                turn,
                                MatchEventKind::CityCaptured { position: pos, side: by },
                            ));
                        }
                    }
                }
            }
            Action::Pacify => {
                if let Some(city) = state.city_mut(pos) {
                    if city.permits_pacify(side) {
                        if let Some(CityTransition::Neutralized { former }) =
                            city.apply_pacify(side)
                        {
                            events.push(MatchEvent::new(
                                turn,
                                MatchEventKind::CityNeutralized {
                                    position: pos,
                                    former,
                                },
                            ));
                        }
                    }
                }
            }
            Action::Idle | Action::Move(_) | Action::Attack(_) => {}
        }
    }

    // Joint pacification check: a neutral city both sides worked this turn
    // opens its peace window.
    let mut brokered = Vec::new();
    for city in state.cities_mut() {
        if let Some(CityTransition::PeaceBrokered) =
            city.close_economy_phase(config.peace_duration)
        {
            brokered.push(city.position);
        }
    }
    for position in brokered {
        events.push(MatchEvent::new(
            turn,
            MatchEventKind::PeaceBrokered { position },
        ));
    }

    // --- Phase 4: income and turn tick ---
    if state.has_cities() {
        let mut controlled: Vec<Side> = Vec::new();
        let mut peace_cities = 0u32;
        for city in state.cities() {
            match city.control {
                CityControl::Controlled { owner, .. } => controlled.push(owner),
                CityControl::PeaceWindow { .. } => peace_cities += 1,
                _ => {}
            }
        }
        for owner in controlled {
            state.add_score(owner, config.control_score);
        }
        for side in Side::BOTH {
            state.add_score(side, config.peace_reward * peace_cities);
        }

        let mut expired = Vec::new();
        for city in state.cities_mut() {
            if let Some(CityTransition::PeaceEnded) = city.tick_peace_window() {
                expired.push(city.position);
            }
        }
        for position in expired {
            events.push(MatchEvent::new(turn, MatchEventKind::PeaceEnded { position }));
        }
    }

    if let Some(interval) = config.resource_respawn_interval {
        if interval > 0 && turn % interval == 0 {
            let count = respawn_resources(state, &config, rng);
            if count > 0 {
                events.push(MatchEvent::new(
                    turn,
                    MatchEventKind::ResourcesRespawned { count },
                ));
            }
        }
    }

    state.advance_turn();
    state.assert_invariants();
    events
}

/// Refill consumed nodes back up to the configured spawn count, drawing
/// placements from the engine RNG.
fn respawn_resources(
    state: &mut GameState,
    config: &crate::core::config::MatchConfig,
    rng: &mut ChaCha8Rng,
) -> u32 {
    let deficit = config
        .resource_spawn_count
        .saturating_sub(state.resource_count());
    if deficit == 0 {
        return 0;
    }

    let mut taken: AHashSet<Position> = state.grid().obstacles().collect();
    taken.extend(Side::BOTH.iter().map(|s| state.base(*s).position));
    taken.extend(state.living_units().map(|u| u.position));
    taken.extend(state.resources().map(|(p, _)| p));
    taken.extend(state.cities().map(|c| c.position));

    let mut spawned = 0u32;
    for _ in 0..deficit {
        let Ok(pos) = sample_free_cell(config, rng, &taken) else {
            break;
        };
        let kind = ResourceKind::ALL[rng.gen_range(0..ResourceKind::ALL.len())];
        state.spawn_resource(pos, kind);
        taken.insert(pos);
        spawned += 1;
    }
    spawned
}

//! Match loop: agents propose, the resolver disposes
//!
//! Owns the authoritative state, the engine RNG, and the event log.
//! Observers (renderers, replay recorders) get an immutable snapshot after
//! every resolved turn; the loop never depends on them succeeding.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::agent::policy::AgentPolicy;
use crate::core::config::MatchConfig;
use crate::core::error::Result;
use crate::core::types::Side;
use crate::engine::events::MatchEvent;
use crate::engine::resolver::resolve_turn;
use crate::engine::victory::{self, MatchVerdict};
use crate::world::setup::build_match_state;
use crate::world::state::GameState;

/// Gets the post-turn snapshot and that turn's events. The turn-0 call
/// carries the initial board with no events.
pub trait MatchObserver {
    fn on_turn(&mut self, state: &GameState, events: &[MatchEvent]);
}

/// Final outcome summary, serializable for tooling
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub winner: Option<Side>,
    pub reason: crate::engine::victory::VictoryReason,
    pub turns_played: u32,
    pub scores: [u32; 2],
    pub base_hp: [u32; 2],
    pub living_units: [u32; 2],
    pub blue_agent: String,
    pub red_agent: String,
}

pub struct Match {
    state: GameState,
    agents: [Box<dyn AgentPolicy>; 2],
    rng: ChaCha8Rng,
    event_log: Vec<MatchEvent>,
}

impl Match {
    pub fn new(
        config: &MatchConfig,
        blue: Box<dyn AgentPolicy>,
        red: Box<dyn AgentPolicy>,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = build_match_state(config, &mut rng)?;
        info!(
            mode = config.mode.label(),
            seed,
            blue = blue.name(),
            red = red.name(),
            "match set up"
        );
        Ok(Self {
            state,
            agents: [blue, red],
            rng,
            event_log: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn event_log(&self) -> &[MatchEvent] {
        &self.event_log
    }

    /// Play the match to termination, feeding every observer along the way.
    pub fn run(&mut self, observers: &mut [&mut dyn MatchObserver]) -> MatchReport {
        for observer in observers.iter_mut() {
            observer.on_turn(&self.state, &[]);
        }

        let verdict = loop {
            if let Some(verdict) = victory::evaluate(&self.state) {
                break verdict;
            }

            // Both sides see the same pre-turn snapshot
            let submitted = [
                self.agents[Side::Blue.index()].choose_actions(&self.state, Side::Blue),
                self.agents[Side::Red.index()].choose_actions(&self.state, Side::Red),
            ];

            let events = resolve_turn(&mut self.state, &submitted, &mut self.rng);
            debug!(
                turn = self.state.turn() - 1,
                events = events.len(),
                blue_score = self.state.score(Side::Blue),
                red_score = self.state.score(Side::Red),
                "turn resolved"
            );

            for observer in observers.iter_mut() {
                observer.on_turn(&self.state, &events);
            }
            self.event_log.extend(events);
        };

        let report = self.report(verdict);
        info!(
            winner = report.winner.map(|s| s.name()).unwrap_or("draw"),
            reason = %report.reason,
            turns = report.turns_played,
            "match over"
        );
        report
    }

    fn report(&self, verdict: MatchVerdict) -> MatchReport {
        MatchReport {
            winner: verdict.winner,
            reason: verdict.reason,
            turns_played: self.state.turn() - 1,
            scores: self.state.scores(),
            base_hp: [
                self.state.base(Side::Blue).hp,
                self.state.base(Side::Red).hp,
            ],
            living_units: [
                self.state.living_count(Side::Blue),
                self.state.living_count(Side::Red),
            ],
            blue_agent: self.agents[Side::Blue.index()].name().to_string(),
            red_agent: self.agents[Side::Red.index()].name().to_string(),
        }
    }
}

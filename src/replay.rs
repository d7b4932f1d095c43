//! Replay recording
//!
//! Captures a full snapshot plus that turn's events after every resolved
//! turn, in a flat vector shape that serializes cleanly to JSON. Playback
//! tooling can reconstruct the whole match without re-running any agent
//! logic.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{Position, Side, Turn};
use crate::engine::events::MatchEvent;
use crate::engine::runner::{MatchObserver, MatchReport};
use crate::world::city::CityControl;
use crate::world::resources::ResourceKind;
use crate::world::state::GameState;

#[derive(Debug, Clone, Serialize)]
pub struct ReplayMeta {
    pub mode: String,
    pub width: i32,
    pub height: i32,
    pub max_turns: u32,
    pub obstacles: Vec<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitFrame {
    pub id: String,
    pub side: Side,
    pub position: Position,
    pub hp: u32,
    pub cargo: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaseFrame {
    pub side: Side,
    pub position: Position,
    pub hp: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceFrame {
    pub position: Position,
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityFrame {
    pub position: Position,
    pub control: CityControl,
}

/// One recorded turn: the post-turn board plus the events that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ReplayFrame {
    /// Turns completed when this frame was captured; 0 is the initial board
    pub turn: Turn,
    pub scores: [u32; 2],
    pub units: Vec<UnitFrame>,
    pub bases: Vec<BaseFrame>,
    pub resources: Vec<ResourceFrame>,
    pub cities: Vec<CityFrame>,
    pub events: Vec<MatchEvent>,
}

impl ReplayFrame {
    fn capture(state: &GameState, events: &[MatchEvent]) -> Self {
        Self {
            turn: state.turn() - 1,
            scores: state.scores(),
            units: state
                .units()
                .map(|u| UnitFrame {
                    id: u.id.to_string(),
                    side: u.side(),
                    position: u.position,
                    hp: u.hp,
                    cargo: u.cargo.total(),
                })
                .collect(),
            bases: Side::BOTH
                .iter()
                .map(|&side| {
                    let base = state.base(side);
                    BaseFrame {
                        side,
                        position: base.position,
                        hp: base.hp,
                    }
                })
                .collect(),
            resources: state
                .resources()
                .map(|(position, kind)| ResourceFrame { position, kind })
                .collect(),
            cities: state
                .cities()
                .map(|c| CityFrame {
                    position: c.position,
                    control: c.control,
                })
                .collect(),
            events: events.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReplayDocument<'a> {
    meta: &'a ReplayMeta,
    frames: &'a [ReplayFrame],
    report: &'a MatchReport,
}

/// Observer that accumulates frames for later export
pub struct ReplayRecorder {
    meta: Option<ReplayMeta>,
    frames: Vec<ReplayFrame>,
}

impl ReplayRecorder {
    pub fn new() -> Self {
        Self {
            meta: None,
            frames: Vec::new(),
        }
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    /// Write the recorded match as a single JSON document.
    pub fn save_json(&self, path: &Path, report: &MatchReport) -> Result<()> {
        let meta = self.meta.as_ref().ok_or_else(|| {
            crate::core::error::ArenaError::Setup("no frames recorded".into())
        })?;
        let doc = ReplayDocument {
            meta,
            frames: &self.frames,
            report,
        };
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &doc)?;
        Ok(())
    }
}

impl Default for ReplayRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchObserver for ReplayRecorder {
    fn on_turn(&mut self, state: &GameState, events: &[MatchEvent]) {
        if self.meta.is_none() {
            self.meta = Some(ReplayMeta {
                mode: state.config().mode.label().to_string(),
                width: state.grid().width(),
                height: state.grid().height(),
                max_turns: state.config().max_turns,
                obstacles: state.grid().obstacles().collect(),
            });
        }
        self.frames.push(ReplayFrame::capture(state, events));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;
    use crate::core::config::MatchConfig;
    use crate::engine::runner::Match;

    #[test]
    fn test_recorder_captures_every_turn() {
        let config = MatchConfig::classic();
        let mut game = Match::new(
            &config,
            Box::new(RandomAgent::new(1)),
            Box::new(RandomAgent::new(2)),
            5,
        )
        .unwrap();
        let mut recorder = ReplayRecorder::new();
        let report = game.run(&mut [&mut recorder]);

        assert_eq!(recorder.frames().len() as u32, report.turns_played + 1);
        assert_eq!(recorder.frames()[0].turn, 0);
        let last = recorder.frames().last().unwrap();
        assert_eq!(last.turn, report.turns_played);
        assert_eq!(last.scores, report.scores);
    }

    #[test]
    fn test_replay_round_trips_through_json() {
        let config = MatchConfig::world();
        let mut game = Match::new(
            &config,
            Box::new(RandomAgent::new(3)),
            Box::new(RandomAgent::new(4)),
            8,
        )
        .unwrap();
        let mut recorder = ReplayRecorder::new();
        let report = game.run(&mut [&mut recorder]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.json");
        recorder.save_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed["frames"].as_array().unwrap().len() as u32,
            report.turns_played + 1
        );
        assert_eq!(parsed["meta"]["width"], config.width);
    }
}

//! Discrete per-turn match events
//!
//! Events are the renderer/replay-facing record of what happened in a
//! resolved turn: harvests, kills, deliveries, base hits, city state
//! changes. The core never depends on anyone consuming them.

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, Side, Turn, UnitId};
use crate::world::resources::ResourceKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub turn: Turn,
    pub kind: MatchEventKind,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEventKind {
    Harvested {
        unit: UnitId,
        kind: ResourceKind,
    },
    Delivered {
        unit: UnitId,
        points: u32,
        combo: bool,
    },
    UnitKilled {
        victim: UnitId,
        attacker: UnitId,
    },
    BaseHit {
        side: Side,
        attacker: UnitId,
        damage: u32,
    },
    BaseDestroyed {
        side: Side,
        attacker: UnitId,
    },
    CityCaptured {
        position: Position,
        side: Side,
    },
    CityNeutralized {
        position: Position,
        former: Side,
    },
    PeaceBrokered {
        position: Position,
    },
    PeaceEnded {
        position: Position,
    },
    ResourcesRespawned {
        count: u32,
    },
}

impl MatchEvent {
    pub fn new(turn: Turn, kind: MatchEventKind) -> Self {
        let description = describe(turn, &kind);
        Self {
            turn,
            kind,
            description,
        }
    }
}

fn describe(turn: Turn, kind: &MatchEventKind) -> String {
    match kind {
        MatchEventKind::Harvested { unit, kind } => {
            format!("Turn {}: {} unit {} harvested {}.", turn, unit.side, unit, kind)
        }
        MatchEventKind::Delivered { unit, points, combo } => {
            let note = if *combo { " + combo bonus" } else { "" };
            format!(
                "Turn {}: {} unit {} delivered for {} pts{}.",
                turn, unit.side, unit, points, note
            )
        }
        MatchEventKind::UnitKilled { victim, attacker } => format!(
            "Turn {}: {} unit {} defeated {} unit {}.",
            turn, attacker.side, attacker, victim.side, victim
        ),
        MatchEventKind::BaseHit {
            side,
            attacker,
            damage,
        } => format!(
            "Turn {}: {} unit {} hit {} base for {}.",
            turn, attacker.side, attacker, side, damage
        ),
        MatchEventKind::BaseDestroyed { side, attacker } => format!(
            "Turn {}: {} unit {} destroyed the {} base!",
            turn, attacker.side, attacker, side
        ),
        MatchEventKind::CityCaptured { position, side } => {
            format!("Turn {}: {} captured the city at {}.", turn, side, position)
        }
        MatchEventKind::CityNeutralized { position, former } => format!(
            "Turn {}: the city at {} slipped from {} control.",
            turn, position, former
        ),
        MatchEventKind::PeaceBrokered { position } => format!(
            "Turn {}: both sides brokered peace at the city at {}.",
            turn, position
        ),
        MatchEventKind::PeaceEnded { position } => format!(
            "Turn {}: the peace window at {} expired.",
            turn, position
        ),
        MatchEventKind::ResourcesRespawned { count } => {
            format!("Turn {}: {} resource nodes respawned.", turn, count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions_name_the_actors() {
        let event = MatchEvent::new(
            4,
            MatchEventKind::UnitKilled {
                victim: UnitId::new(Side::Red, 1),
                attacker: UnitId::new(Side::Blue, 0),
            },
        );
        assert!(event.description.contains("Turn 4"));
        assert!(event.description.contains("b0"));
        assert!(event.description.contains("r1"));
    }

    #[test]
    fn test_combo_flag_shows_in_description() {
        let with = MatchEvent::new(
            1,
            MatchEventKind::Delivered {
                unit: UnitId::new(Side::Blue, 0),
                points: 23,
                combo: true,
            },
        );
        let without = MatchEvent::new(
            1,
            MatchEventKind::Delivered {
                unit: UnitId::new(Side::Blue, 0),
                points: 18,
                combo: false,
            },
        );
        assert!(with.description.contains("combo"));
        assert!(!without.description.contains("combo"));
    }
}

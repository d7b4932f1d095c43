//! Match configuration
//!
//! Every tunable constant lives here and is immutable for the duration of
//! a match. The two presets mirror the shipped rulesets: the classic
//! resource skirmish and the world conquest/peace variant.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ArenaError, Result};
use crate::world::resources::RESOURCE_KIND_COUNT;

/// Which ruleset a match runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// Resource-harvest skirmish: gather, deliver, fight around the bases
    Classic,
    /// City conquest/peace variant: capture cities for income or pacify
    /// them for shared peace dividends
    World,
}

impl ModeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModeKind::Classic => "Classic Grid",
            ModeKind::World => "World Conquest/Peace",
        }
    }
}

/// Tuning weights for the heuristic agent's candidate scoring
///
/// These are gameplay tuning parameters, not engine rules; the heuristic
/// stays a greedy single-turn policy under any weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Reward for an attack expected to kill its target this turn
    pub kill_reward: f32,
    /// Reward per point of damage for a non-lethal attack
    pub damage_reward: f32,
    /// Multiplier on the points a delivery would score right now
    pub delivery_weight: f32,
    /// Multiplier on the point value of the node under the unit
    pub harvest_weight: f32,
    /// Flat reward for stabilization work at a city
    pub stabilize_weight: f32,
    /// Extra reward when one more stabilize completes a capture
    pub capture_bonus: f32,
    /// Flat reward for pacification work at a city
    pub pacify_weight: f32,
    /// Attraction toward the unit's current objective, decayed by distance
    pub objective_weight: f32,
    /// Penalty per enemy attack point bearing on a cell within the threat radius
    pub risk_weight: f32,
    /// Radius (Manhattan) within which enemies contribute threat
    pub threat_radius: u32,
    /// Units with index below this hang back to defend when threatened
    pub defender_count: u32,
    /// Radius around the home base that defenders try to hold
    pub defense_radius: u32,
    /// Attraction toward the home base for defenders under threat
    pub defense_bias: f32,
    /// Units at or below this HP retreat toward base when enemies are close
    pub retreat_hp: u32,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            kill_reward: 30.0,
            damage_reward: 2.0,
            delivery_weight: 1.5,
            harvest_weight: 2.0,
            stabilize_weight: 8.0,
            capture_bonus: 12.0,
            pacify_weight: 6.0,
            objective_weight: 10.0,
            risk_weight: 0.6,
            threat_radius: 2,
            defender_count: 1,
            defense_radius: 3,
            defense_bias: 6.0,
            retreat_hp: 4,
        }
    }
}

/// Immutable configuration for one match
///
/// Supplied at match start and threaded through every component; there is
/// no process-wide mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub mode: ModeKind,

    // Board
    pub width: i32,
    pub height: i32,
    pub obstacle_count: usize,

    // Resources
    /// Point value per resource kind, indexed by `ResourceKind::index()`
    pub resource_values: [u32; RESOURCE_KIND_COUNT],
    pub resource_spawn_count: usize,
    /// Refill consumed nodes every N turns during the income phase
    pub resource_respawn_interval: Option<u32>,

    // Units and bases
    pub units_per_side: u32,
    pub unit_hp: u32,
    pub unit_attack: u32,
    pub carry_capacity: u8,
    pub base_hp: u32,

    // Scoring
    pub kill_score: u32,
    pub base_destroy_score: u32,
    pub combo_bonus: u32,
    pub max_turns: u32,

    // Cities (world mode; zero cities disables the whole subsystem)
    pub city_count: usize,
    pub capture_threshold: u32,
    pub control_score: u32,
    pub peace_reward: u32,
    pub peace_duration: u32,

    pub heuristic: HeuristicWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::world()
    }
}

impl MatchConfig {
    /// The original resource-harvest skirmish ruleset
    pub fn classic() -> Self {
        Self {
            mode: ModeKind::Classic,
            width: 12,
            height: 12,
            obstacle_count: 14,
            resource_values: [4, 6, 8],
            resource_spawn_count: 18,
            resource_respawn_interval: None,
            units_per_side: 3,
            unit_hp: 10,
            unit_attack: 3,
            carry_capacity: 3,
            base_hp: 30,
            kill_score: 10,
            base_destroy_score: 30,
            combo_bonus: 5,
            max_turns: 200,
            city_count: 0,
            capture_threshold: 2,
            control_score: 0,
            peace_reward: 0,
            peace_duration: 0,
            heuristic: HeuristicWeights::default(),
        }
    }

    /// The world-scale conquest/peace ruleset
    pub fn world() -> Self {
        Self {
            mode: ModeKind::World,
            width: 14,
            height: 10,
            obstacle_count: 18,
            resource_values: [4, 6, 8],
            resource_spawn_count: 10,
            resource_respawn_interval: None,
            units_per_side: 4,
            unit_hp: 12,
            unit_attack: 3,
            carry_capacity: 3,
            base_hp: 35,
            kill_score: 10,
            base_destroy_score: 35,
            combo_bonus: 6,
            max_turns: 220,
            city_count: 7,
            capture_threshold: 2,
            control_score: 3,
            peace_reward: 1,
            peace_duration: 4,
            heuristic: HeuristicWeights::default(),
        }
    }

    /// Load a config from a TOML file; absent keys fall back to the
    /// world-mode defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MatchConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Reject configurations that cannot produce a legal board.
    ///
    /// Fatal at match setup: no turn ever executes against a bad config.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ArenaError::Config(format!(
                "board dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_turns == 0 {
            return Err(ArenaError::Config("max_turns must be at least 1".into()));
        }
        if self.units_per_side == 0 {
            return Err(ArenaError::Config(
                "units_per_side must be at least 1".into(),
            ));
        }
        if self.unit_hp == 0 || self.base_hp == 0 {
            return Err(ArenaError::Config(
                "unit and base HP must be positive".into(),
            ));
        }
        if self.unit_attack == 0 {
            return Err(ArenaError::Config("unit_attack must be positive".into()));
        }
        if self.carry_capacity == 0 {
            return Err(ArenaError::Config(
                "carry_capacity must be at least 1".into(),
            ));
        }
        if self.city_count > 0 && self.capture_threshold == 0 {
            return Err(ArenaError::Config(
                "capture_threshold must be at least 1 when cities are enabled".into(),
            ));
        }
        if self.city_count > 0 && self.peace_duration == 0 {
            return Err(ArenaError::Config(
                "peace_duration must be at least 1 when cities are enabled".into(),
            ));
        }

        // Two bases, both squads, and every placed feature need distinct cells.
        let demand = 2
            + 2 * self.units_per_side as usize
            + self.obstacle_count
            + self.resource_spawn_count
            + self.city_count;
        if demand > self.cell_count() {
            return Err(ArenaError::Config(format!(
                "board too small: {} cells needed, {} available",
                demand,
                self.cell_count()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(MatchConfig::classic().validate().is_ok());
        assert!(MatchConfig::world().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let mut config = MatchConfig::classic();
        config.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overfull_board() {
        let mut config = MatchConfig::classic();
        config.width = 3;
        config.height = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_carry_capacity() {
        let mut config = MatchConfig::world();
        config.carry_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_capture_threshold_with_cities() {
        let mut config = MatchConfig::world();
        config.capture_threshold = 0;
        assert!(config.validate().is_err());

        // Fine without cities
        config.city_count = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MatchConfig::world();
        let text = toml::to_string(&config).unwrap();
        let parsed: MatchConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let parsed: MatchConfig = toml::from_str("max_turns = 50\n").unwrap();
        assert_eq!(parsed.max_turns, 50);
        assert_eq!(parsed.width, MatchConfig::world().width);
    }
}

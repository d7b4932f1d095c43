//! Turn engine: action validation, four-phase resolution, victory
//! evaluation, and the match loop

pub mod action;
pub mod events;
pub mod resolver;
pub mod runner;
pub mod victory;

pub use action::{validate_action, Action};
pub use events::{MatchEvent, MatchEventKind};
pub use resolver::resolve_turn;
pub use runner::{Match, MatchObserver, MatchReport};
pub use victory::{evaluate, MatchVerdict, VictoryReason};

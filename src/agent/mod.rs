//! Agent policies: the trait boundary plus the shipped baseline and
//! heuristic implementations

pub mod heuristic;
pub mod policy;
pub mod random;

pub use heuristic::HeuristicAgent;
pub use policy::{legal_candidates, ActionMap, AgentPolicy};
pub use random::RandomAgent;

//! Arena Grid - Deterministic Two-Sided Grid Battle Simulator

pub mod agent;
pub mod core;
pub mod engine;
pub mod replay;
pub mod world;

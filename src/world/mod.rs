//! World model: grid, units, bases, resources, cities, and the game state
//! aggregate

pub mod city;
pub mod grid;
pub mod resources;
pub mod setup;
pub mod state;
pub mod units;

pub use city::{CityControl, CitySite, CityTransition};
pub use grid::Grid;
pub use resources::{Cargo, ResourceKind, RESOURCE_KIND_COUNT};
pub use setup::build_match_state;
pub use state::GameState;
pub use units::{Base, PlayerState, Unit};

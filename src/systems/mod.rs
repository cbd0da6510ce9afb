//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod simulation;

pub use simulation::{ContactTally, SimulationResult, SimulationSystem};

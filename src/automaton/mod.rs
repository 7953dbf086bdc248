//! Core percolation engine.
//!
//! This module contains the grid model, seed construction, the infection
//! step and the run/race state machines. The FFI layer in `ffi/` calls into
//! these types.

pub mod grid;
pub mod infected;
pub mod race;
pub mod region;
pub mod run;
pub mod seed;
pub mod stepping;

pub use grid::{neighbors, Cell, GridShape, MAX_DIMS};
pub use infected::InfectedSet;
pub use race::{Race, RaceResult, RoundOutcome, Standing};
pub use region::{extract_layer, extract_region};
pub use run::{Advance, GenerationEvent, Generations, RunStatus, Simulation, SimulationRun};
pub use seed::{DiagonalSeed, Direction, SeedSpec};
pub use stepping::{step, Threshold};

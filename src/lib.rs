//! Bootstrap Percolation - threshold cellular automata on 2D and 3D grids
//!
//! A healthy cell becomes infected once at least `threshold` of its
//! orthogonal neighbors are infected; all cells update simultaneously.
//! The library runs single simulations, races several against each other,
//! and exposes a C ABI for front ends that render the generations.

pub mod automaton;
pub mod config;
pub mod error;
pub mod ffi;
pub mod metrics;


pub use automaton::{
    Cell, GenerationEvent, GridShape, InfectedSet, Race, RaceResult, RunStatus, SeedSpec,
    Simulation, SimulationRun, Threshold,
};
pub use config::{EngineConfig, RaceConfig};
pub use error::{EngineError, Result};

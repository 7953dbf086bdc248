//! C FFI layer for presentation front ends.
//!
//! This module exports C ABI functions so a renderer in another language can
//! drive a run generation by generation. All functions are marked with
//! `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `automaton` module. These functions are thin
//! wrappers that handle null checks, pointer safety, and C-to-Rust
//! conversions.

pub mod lifecycle;
pub mod region;
pub mod run;

pub use lifecycle::{pe_run_create, pe_run_destroy, pe_run_generation, pe_run_infected_count};
pub use region::pe_run_extract_region;
pub use run::{
    pe_run_advance, pe_run_get_cell, pe_run_status, PE_ERR_NULL, PE_ERR_TERMINAL,
    PE_STATUS_CAPPED, PE_STATUS_FIXPOINT, PE_STATUS_RUNNING, PE_STATUS_SATURATED,
};

//! Advancing runs and querying their state.

use std::slice;

use crate::automaton::{Cell, RunStatus, SimulationRun};

pub const PE_STATUS_RUNNING: i32 = 0;
pub const PE_STATUS_FIXPOINT: i32 = 1;
pub const PE_STATUS_SATURATED: i32 = 2;
pub const PE_STATUS_CAPPED: i32 = 3;

/// Returned for a null handle.
pub const PE_ERR_NULL: i32 = -1;
/// Returned when advancing a run that already finished.
pub const PE_ERR_TERMINAL: i32 = -2;

fn status_code(status: RunStatus) -> i32 {
    match status {
        RunStatus::Running => PE_STATUS_RUNNING,
        RunStatus::Fixpoint => PE_STATUS_FIXPOINT,
        RunStatus::Saturated => PE_STATUS_SATURATED,
        RunStatus::Capped => PE_STATUS_CAPPED,
    }
}

/// Advances a run by one generation.
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
///
/// # Returns
/// The status code after the step, `PE_ERR_TERMINAL` if the run had already
/// finished, or `PE_ERR_NULL` for a null handle.
#[no_mangle]
pub unsafe extern "C" fn pe_run_advance(ptr: *mut SimulationRun) -> i32 {
    if ptr.is_null() {
        return PE_ERR_NULL;
    }

    let run = &mut *ptr;
    match run.advance() {
        Ok(step) => status_code(step.status),
        Err(_) => PE_ERR_TERMINAL,
    }
}

/// Gets the current status code of a run.
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
#[no_mangle]
pub unsafe extern "C" fn pe_run_status(ptr: *const SimulationRun) -> i32 {
    if ptr.is_null() {
        return PE_ERR_NULL;
    }
    status_code((*ptr).status())
}

/// Gets whether a cell is infected (1) or not (0).
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
/// - `coords` must point to as many values as the run has axes
///
/// # Returns
/// 0 if out of bounds, null pointer, or healthy; 1 if infected.
#[no_mangle]
pub unsafe extern "C" fn pe_run_get_cell(ptr: *const SimulationRun, coords: *const i32) -> u8 {
    if ptr.is_null() || coords.is_null() {
        return 0;
    }

    let run = &*ptr;
    let coords = slice::from_raw_parts(coords, run.shape().dims());
    match Cell::new(coords) {
        Ok(cell) => run.snapshot().contains(&cell) as u8,
        Err(_) => 0,
    }
}

//! Run creation, destruction, and generation queries.

use std::slice;

use crate::automaton::{seed, Cell, GridShape, InfectedSet, SimulationRun};
use crate::error::Result;

fn build_run(
    extents: &[u32],
    threshold: u32,
    max_generations: u32,
    seeds: &[i32],
) -> Result<SimulationRun> {
    let extents: Vec<usize> = extents.iter().map(|&e| e as usize).collect();
    let shape = GridShape::new(&extents)?;
    let cells = seeds
        .chunks_exact(shape.dims())
        .map(Cell::new)
        .collect::<Result<Vec<_>>>()?;
    let initial = seed::build(&[seed::SeedSpec::Cells { cells }], &shape)?;
    SimulationRun::new(shape, threshold, initial, max_generations)
}

/// Creates a new simulation run and returns an opaque pointer.
///
/// `extents` holds `dims` axis sizes (2 or 3). `seeds` holds `seed_count`
/// cells, `dims` coordinates each. Seeds outside the grid are dropped.
///
/// # Safety
/// - `extents` must point to `dims` readable values
/// - `seeds` must point to `seed_count * dims` readable values, or be null
///   when `seed_count` is 0
///
/// # Returns
/// A pointer to a new run, or null if any argument is invalid. The pointer
/// must eventually be freed with `pe_run_destroy()`.
#[no_mangle]
pub unsafe extern "C" fn pe_run_create(
    extents: *const u32,
    dims: u32,
    threshold: u32,
    max_generations: u32,
    seeds: *const i32,
    seed_count: u32,
) -> *mut SimulationRun {
    if extents.is_null() || (seeds.is_null() && seed_count > 0) {
        return std::ptr::null_mut();
    }

    let extents = slice::from_raw_parts(extents, dims as usize);
    let seeds: &[i32] = if seed_count == 0 {
        &[]
    } else {
        slice::from_raw_parts(seeds, seed_count as usize * dims as usize)
    };

    match build_run(extents, threshold, max_generations, seeds) {
        Ok(run) => Box::into_raw(Box::new(run)),
        Err(err) => {
            log::warn!("pe_run_create rejected its arguments: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Destroys a run and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `pe_run_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn pe_run_destroy(ptr: *mut SimulationRun) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the number of generations a run has completed.
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn pe_run_generation(ptr: *const SimulationRun) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generations_elapsed()
}

/// Gets the number of infected cells.
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
#[no_mangle]
pub unsafe extern "C" fn pe_run_infected_count(ptr: *const SimulationRun) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    let infected: &InfectedSet = (*ptr).snapshot();
    infected.len() as u64
}

//! Region extraction FFI functions.

use std::slice;

use crate::automaton::{self, SimulationRun};

/// Extracts a box of cells into a flat output buffer.
///
/// # Layout
/// One byte per cell (0 = healthy, 1 = infected), first axis changing
/// fastest. `min` and `max` bound the box as `[min, max)` per axis and are
/// clamped to the grid.
///
/// # Safety
/// - `ptr` must be a valid pointer to a run, or null
/// - `out_buf` must point to `out_len` writable bytes
/// - `min` and `max` must each point to as many values as the run has axes
///
/// # Returns
/// Number of bytes written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn pe_run_extract_region(
    ptr: *const SimulationRun,
    out_buf: *mut u8,
    out_len: u64,
    min: *const i32,
    max: *const i32,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() || min.is_null() || max.is_null() {
        return 0;
    }

    let run = &*ptr;
    let dims = run.shape().dims();
    let out_slice = slice::from_raw_parts_mut(out_buf, out_len as usize);
    let min = slice::from_raw_parts(min, dims);
    let max = slice::from_raw_parts(max, dims);

    automaton::extract_region(run.snapshot(), out_slice, min, max)
}

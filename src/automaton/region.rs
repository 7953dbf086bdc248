//! Dense region extraction for consumers that draw the grid.

use super::grid::{Cell, GridShape, MAX_DIMS};
use super::infected::InfectedSet;

/// Clamp `[min, max)` per axis to the grid. `None` if the box is empty or the
/// rank does not match.
fn clamp_box(
    shape: &GridShape,
    min: &[i32],
    max: &[i32],
) -> Option<([i32; MAX_DIMS], [i32; MAX_DIMS])> {
    let dims = shape.dims();
    if min.len() != dims || max.len() != dims {
        return None;
    }

    let mut lo = [0i32; MAX_DIMS];
    let mut hi = [0i32; MAX_DIMS];
    for axis in 0..dims {
        let extent = shape.extent(axis) as i32;
        lo[axis] = min[axis].clamp(0, extent);
        hi[axis] = max[axis].clamp(0, extent);
        if lo[axis] >= hi[axis] {
            return None;
        }
    }
    Some((lo, hi))
}

/// Copy the box `[min, max)` of `set` into `out_buf`, one byte per cell
/// (0 = healthy, 1 = infected).
///
/// # Layout
/// The first axis changes fastest, matching the grid's own index order.
/// Coordinates are clamped to the grid.
///
/// # Returns
/// Number of bytes written, or 0 if the box is empty, the rank is wrong, or
/// `out_buf` is too small.
pub fn extract_region(set: &InfectedSet, out_buf: &mut [u8], min: &[i32], max: &[i32]) -> u64 {
    let shape = set.shape();
    let Some((lo, hi)) = clamp_box(shape, min, max) else {
        return 0;
    };
    let dims = shape.dims();

    let total_size: usize = (0..dims).map(|a| (hi[a] - lo[a]) as usize).product();
    if out_buf.len() < total_size {
        return 0;
    }

    let bytes = set.as_bytes();
    let mut cursor = lo;
    for slot in out_buf.iter_mut().take(total_size) {
        let cell = match Cell::new(&cursor[..dims]) {
            Ok(cell) => cell,
            Err(_) => return 0,
        };
        *slot = bytes[shape.index_of(&cell)];

        // Odometer over the box, first axis fastest
        for axis in 0..dims {
            cursor[axis] += 1;
            if cursor[axis] < hi[axis] {
                break;
            }
            cursor[axis] = lo[axis];
        }
    }

    total_size as u64
}

/// One `rows x cols` layer of a 3D set, or the whole plane of a 2D set.
pub fn extract_layer(set: &InfectedSet, layer: i32) -> Vec<u8> {
    let shape = set.shape();
    let plane = shape.extent(0) * shape.extent(1);
    let mut buf = vec![0u8; plane];

    let (rows, cols) = (shape.extent(0) as i32, shape.extent(1) as i32);
    let written = if shape.dims() == 3 {
        extract_region(
            set,
            &mut buf,
            &[0, 0, layer],
            &[rows, cols, layer.saturating_add(1)],
        )
    } else {
        extract_region(set, &mut buf, &[0, 0], &[rows, cols])
    };
    buf.truncate(written as usize);
    buf
}

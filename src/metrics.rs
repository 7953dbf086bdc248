//! Measurements over infected sets.
//!
//! In 2D with threshold 2 (or more) the perimeter of the infected region can
//! never grow: a cell only becomes infected when at least two of its four
//! edges already touch the region. That makes the perimeter a cheap
//! certificate that some seeds can never fill the grid.

use crate::automaton::{GridShape, InfectedSet, Threshold};
use crate::error::{EngineError, Result};

/// Count of cell faces between an infected cell and a healthy cell or the
/// grid boundary. Perimeter in 2D, surface area in 3D.
pub fn boundary_faces(set: &InfectedSet) -> usize {
    let shape = set.shape();
    let faces_per_cell = 2 * shape.dims();

    (0..shape.volume())
        .filter(|&i| set.contains_index(i))
        .map(|i| {
            let covered = shape
                .neighbor_indices(i)
                .filter(|&n| set.contains_index(n))
                .count();
            faces_per_cell - covered
        })
        .sum()
}

/// Perimeter of a 2D infected region.
pub fn perimeter(set: &InfectedSet) -> Result<usize> {
    require_2d(set.shape())?;
    Ok(boundary_faces(set))
}

/// Perimeter of the fully infected grid, `2 * (rows + cols)`.
pub fn full_perimeter(shape: &GridShape) -> Result<usize> {
    require_2d(shape)?;
    Ok(2 * (shape.extent(0) + shape.extent(1)))
}

/// False when the perimeter bound proves `initial` can never saturate.
///
/// Only thresholds of 2 or more carry the bound; lower thresholds always
/// return true.
pub fn perimeter_allows_saturation(initial: &InfectedSet, threshold: Threshold) -> Result<bool> {
    let have = perimeter(initial)?;
    if threshold.get() < 2 {
        return Ok(true);
    }
    Ok(have >= full_perimeter(initial.shape())?)
}

/// True when every cell of the grid is infected.
#[inline]
pub fn is_saturated(set: &InfectedSet) -> bool {
    set.is_saturated()
}

fn require_2d(shape: &GridShape) -> Result<()> {
    if shape.dims() != 2 {
        return Err(EngineError::InvalidDimension {
            expected: 2,
            actual: shape.dims(),
        });
    }
    Ok(())
}

//! Threshold infection step.

use serde::{Deserialize, Serialize};

use super::grid::Cell;
use super::infected::InfectedSet;
use crate::error::{EngineError, Result};

/// Minimum number of infected orthogonal neighbors for a healthy cell to
/// become infected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Threshold(u32);

impl Threshold {
    pub fn new(value: u32) -> Result<Self> {
        if value < 1 {
            return Err(EngineError::InvalidThreshold(value));
        }
        Ok(Threshold(value))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Threshold {
    type Error = EngineError;

    fn try_from(value: u32) -> Result<Self> {
        Threshold::new(value)
    }
}

impl From<Threshold> for u32 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

/// Count infected neighbors of `index`, stopping early once `limit` is hit.
#[inline]
fn count_infected_neighbors(current: &InfectedSet, index: usize, limit: u32) -> u32 {
    let mut count = 0;
    for n in current.shape().neighbor_indices(index) {
        if current.contains_index(n) {
            count += 1;
            if count >= limit {
                break;
            }
        }
    }
    count
}

/// Indices of the cells that become infected in the next generation.
///
/// Every count reads the same frozen `current`; nothing found in this pass
/// feeds back into it.
pub(crate) fn newly_infected_indices(current: &InfectedSet, threshold: Threshold) -> Vec<usize> {
    let limit = threshold.get();
    (0..current.as_bytes().len())
        .filter(|&i| !current.contains_index(i))
        .filter(|&i| count_infected_neighbors(current, i, limit) >= limit)
        .collect()
}

/// Cells that become infected in the next generation, in index order.
///
/// `current` is not modified. Returns an empty vector when no cell
/// qualifies.
pub fn step(current: &InfectedSet, threshold: Threshold) -> Vec<Cell> {
    let shape = current.shape();
    newly_infected_indices(current, threshold)
        .into_iter()
        .map(|i| shape.cell_at(i))
        .collect()
}

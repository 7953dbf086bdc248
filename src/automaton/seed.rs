//! Seed construction from declarative specs.
//!
//! A seed table is plain data (it deserializes from config), and `build`
//! turns it into the initial infected set of one grid. Cells that fall off
//! the grid are dropped rather than rejected, so a diagonal that runs past an
//! edge is simply truncated.

use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridShape};
use super::infected::InfectedSet;
use crate::error::{EngineError, Result};

/// Which way a diagonal run moves along the row axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Row increases with column.
    #[default]
    Forward,
    /// Row decreases as column increases.
    Reverse,
}

impl Direction {
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// `length` cells starting at `(row, col)`, stepping one column right and one
/// row in `direction` each time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiagonalSeed {
    pub row: i32,
    pub col: i32,
    pub length: u32,
    #[serde(default)]
    pub direction: Direction,
}

impl DiagonalSeed {
    /// A forward diagonal.
    pub fn new(row: i32, col: i32, length: u32) -> Self {
        DiagonalSeed {
            row,
            col,
            length,
            direction: Direction::Forward,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Every cell of the run, in or out of bounds.
    ///
    /// The run stops early once a coordinate would leave the `i32` range.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (row, col) = (i64::from(self.row), i64::from(self.col));
        let delta = i64::from(self.direction.delta());
        let row_room = match self.direction {
            Direction::Forward => i64::from(i32::MAX) - row,
            Direction::Reverse => row - i64::from(i32::MIN),
        };
        let len = i64::from(self.length)
            .min(i64::from(i32::MAX) - col + 1)
            .min(row_room + 1);
        (0..len).map(move |i| Cell::d2((row + i * delta) as i32, (col + i) as i32))
    }

    /// The cells of the run that land inside `shape`, which must be 2D.
    ///
    /// Only the offsets that hit the grid are visited, so a very long run
    /// costs no more than the grid's short side.
    pub fn cells_within(&self, shape: &GridShape) -> impl Iterator<Item = Cell> {
        let (row, col) = (i64::from(self.row), i64::from(self.col));
        let (rows, cols) = (shape.extent(0) as i64, shape.extent(1) as i64);
        let delta = i64::from(self.direction.delta());

        let (row_lo, row_hi) = match self.direction {
            Direction::Forward => (-row, rows - row),
            Direction::Reverse => (row - rows + 1, row + 1),
        };
        let lo = (-col).max(row_lo).max(0);
        let hi = (cols - col).min(row_hi).min(i64::from(self.length));
        (lo..hi).map(move |i| Cell::d2((row + i * delta) as i32, (col + i) as i32))
    }
}

/// One declarative piece of an initial infected set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedSpec {
    /// A diagonal run on a 2D grid.
    Diagonal(DiagonalSeed),
    /// One permutation per layer of a 3D grid; layer `z` infects
    /// `(r, perms[z][r], z)` for every row `r`.
    PermutationLayers { perms: Vec<Vec<usize>> },
    /// Explicit cells.
    Cells { cells: Vec<Cell> },
}

impl SeedSpec {
    pub fn diagonal(row: i32, col: i32, length: u32) -> Self {
        SeedSpec::Diagonal(DiagonalSeed::new(row, col, length))
    }

    /// `n` layers where layer `z` is the identity permutation rotated by `z`.
    pub fn shifted_layers(n: usize) -> Self {
        let perms = (0..n)
            .map(|z| (0..n).map(|r| (r + z) % n).collect())
            .collect();
        SeedSpec::PermutationLayers { perms }
    }
}

fn require_dims(shape: &GridShape, expected: usize) -> Result<()> {
    if shape.dims() != expected {
        return Err(EngineError::InvalidDimension {
            expected,
            actual: shape.dims(),
        });
    }
    Ok(())
}

/// Check that `perms` holds exactly `n` bijections on `[0, n)`.
fn validate_permutations(perms: &[Vec<usize>], n: usize) -> Result<()> {
    if perms.len() != n {
        return Err(EngineError::InvalidPermutation(format!(
            "expected {n} layers, got {}",
            perms.len()
        )));
    }

    for (z, perm) in perms.iter().enumerate() {
        if perm.len() != n {
            return Err(EngineError::InvalidPermutation(format!(
                "layer {z} has {} entries, expected {n}",
                perm.len()
            )));
        }
        let mut seen = vec![false; n];
        for &col in perm {
            if col >= n || seen[col] {
                return Err(EngineError::InvalidPermutation(format!(
                    "layer {z} {perm:?} is not a permutation of 0..{n}"
                )));
            }
            seen[col] = true;
        }
    }
    Ok(())
}

/// Build the initial infected set described by `specs` on `shape`.
///
/// Overlapping specs union. An empty spec list gives an empty set. Nothing
/// is returned unless every spec is valid.
pub fn build(specs: &[SeedSpec], shape: &GridShape) -> Result<InfectedSet> {
    let mut set = InfectedSet::new(*shape);

    for spec in specs {
        match spec {
            SeedSpec::Diagonal(diag) => {
                require_dims(shape, 2)?;
                for cell in diag.cells_within(shape) {
                    set.insert(cell)?;
                }
            }
            SeedSpec::PermutationLayers { perms } => {
                require_dims(shape, 3)?;
                let n = shape.extent(0);
                validate_permutations(perms, n)?;
                for (z, perm) in perms.iter().enumerate() {
                    for (r, &c) in perm.iter().enumerate() {
                        set.insert(Cell::d3(r as i32, c as i32, z as i32))?;
                    }
                }
            }
            SeedSpec::Cells { cells } => {
                for &cell in cells {
                    set.insert(cell)?;
                }
            }
        }
    }

    log::debug!(
        "built {} seed cells from {} specs on {}",
        set.len(),
        specs.len(),
        shape
    );
    Ok(set)
}

//! The set of infected cells of one grid.

use super::grid::{Cell, GridShape};
use crate::error::Result;

/// All cells infected as of some generation.
///
/// Backed by a dense occupancy buffer over its grid (0 = healthy,
/// 1 = infected), so membership is a single lookup and two sets compare equal
/// exactly when they hold the same cells of the same grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfectedSet {
    shape: GridShape,
    cells: Vec<u8>,
    count: usize,
}

impl InfectedSet {
    /// An empty set over `shape`.
    pub fn new(shape: GridShape) -> Self {
        InfectedSet {
            shape,
            cells: vec![0; shape.volume()],
            count: 0,
        }
    }

    /// Collect `cells` into a set. Out-of-bounds cells are dropped.
    pub fn from_cells<I>(shape: GridShape, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut set = Self::new(shape);
        for cell in cells {
            set.insert(cell)?;
        }
        Ok(set)
    }

    #[inline]
    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when every cell of the grid is infected.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.count == self.cells.len()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.shape.in_bounds(cell) && self.cells[self.shape.index_of(cell)] != 0
    }

    /// Add a cell, returning whether it was newly inserted.
    ///
    /// A cell of the wrong rank is an error. Out-of-bounds cells are
    /// silently ignored.
    pub fn insert(&mut self, cell: Cell) -> Result<bool> {
        self.shape.check_dims(&cell)?;
        if !self.shape.in_bounds(&cell) {
            return Ok(false);
        }
        Ok(self.insert_index(self.shape.index_of(&cell)))
    }

    #[inline]
    pub(crate) fn contains_index(&self, index: usize) -> bool {
        self.cells[index] != 0
    }

    pub(crate) fn insert_index(&mut self, index: usize) -> bool {
        if self.cells[index] != 0 {
            return false;
        }
        self.cells[index] = 1;
        self.count += 1;
        true
    }

    /// Infected cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(move |(i, _)| self.shape.cell_at(i))
    }

    /// Raw occupancy buffer in index order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}

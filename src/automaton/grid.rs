//! Grid shapes, cell addresses and the orthogonal neighbor function.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Highest dimensionality the engine supports.
pub const MAX_DIMS: usize = 3;

/// Extent of each axis of a 2D or 3D grid.
///
/// Cells are stored with the first axis changing fastest, so a 2D grid of
/// `(rows, cols)` is laid out column by column and a 3D grid layer by layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    extents: [usize; MAX_DIMS],
    strides: [usize; MAX_DIMS],
    dims: usize,
}

impl GridShape {
    /// Build a shape from 2 or 3 positive extents.
    pub fn new(extents: &[usize]) -> Result<Self> {
        if extents.len() < 2 || extents.len() > MAX_DIMS {
            return Err(EngineError::InvalidDimension {
                expected: extents.len().clamp(2, MAX_DIMS),
                actual: extents.len(),
            });
        }
        if let Some(axis) = extents.iter().position(|&e| e == 0) {
            return Err(EngineError::InvalidShape(format!(
                "extent of axis {axis} is zero"
            )));
        }

        if let Some(axis) = extents.iter().position(|&e| e > i32::MAX as usize) {
            return Err(EngineError::InvalidShape(format!(
                "extent of axis {axis} does not fit a cell coordinate"
            )));
        }

        let mut shape = GridShape {
            extents: [1; MAX_DIMS],
            strides: [0; MAX_DIMS],
            dims: extents.len(),
        };
        let mut stride = 1;
        for (axis, &extent) in extents.iter().enumerate() {
            shape.extents[axis] = extent;
            shape.strides[axis] = stride;
            stride = stride.checked_mul(extent).ok_or_else(|| {
                EngineError::InvalidShape("grid volume overflows".to_string())
            })?;
        }
        Ok(shape)
    }

    /// An `n` x `n` grid.
    pub fn square(n: usize) -> Result<Self> {
        Self::new(&[n, n])
    }

    /// An `n` x `n` x `n` grid.
    pub fn cube(n: usize) -> Result<Self> {
        Self::new(&[n, n, n])
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    #[inline]
    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.dims]
    }

    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.extents[axis]
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.extents().iter().product()
    }

    /// Fail with `InvalidDimension` unless `cell` has this shape's rank.
    pub fn check_dims(&self, cell: &Cell) -> Result<()> {
        if cell.dims() != self.dims {
            return Err(EngineError::InvalidDimension {
                expected: self.dims,
                actual: cell.dims(),
            });
        }
        Ok(())
    }

    /// Check if a cell has this shape's rank and lies inside every axis.
    #[inline]
    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.dims() == self.dims
            && cell
                .coords()
                .iter()
                .zip(self.extents())
                .all(|(&c, &e)| c >= 0 && (c as usize) < e)
    }

    /// Linear index of an in-bounds cell.
    #[inline]
    pub fn index_of(&self, cell: &Cell) -> usize {
        cell.coords()
            .iter()
            .zip(&self.strides)
            .map(|(&c, &s)| c as usize * s)
            .sum()
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn cell_at(&self, index: usize) -> Cell {
        let mut coords = [0i32; MAX_DIMS];
        let mut rest = index;
        for axis in 0..self.dims {
            coords[axis] = (rest % self.extents[axis]) as i32;
            rest /= self.extents[axis];
        }
        Cell {
            coords,
            dims: self.dims as u8,
        }
    }

    /// Every cell of the grid, in index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.volume()).map(move |i| self.cell_at(i))
    }

    /// Linear indices of the in-bounds orthogonal neighbors of `index`.
    ///
    /// Axis-major, negative before positive, matching [`neighbors`].
    pub(crate) fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> {
        let mut out = [0usize; 2 * MAX_DIMS];
        let mut len = 0;
        let mut rest = index;
        for axis in 0..self.dims {
            let coord = rest % self.extents[axis];
            rest /= self.extents[axis];
            if coord > 0 {
                out[len] = index - self.strides[axis];
                len += 1;
            }
            if coord + 1 < self.extents[axis] {
                out[len] = index + self.strides[axis];
                len += 1;
            }
        }
        out.into_iter().take(len)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.extents().iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join("x"))
    }
}

/// A grid point in 2 or 3 dimensions.
///
/// Coordinates are signed so that seed builders can describe cells that fall
/// off the grid before filtering them out. Equality and hashing are by
/// coordinate tuple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Cell {
    coords: [i32; MAX_DIMS],
    dims: u8,
}

impl Cell {
    /// Build a cell from 2 or 3 coordinates.
    pub fn new(coords: &[i32]) -> Result<Self> {
        if coords.len() < 2 || coords.len() > MAX_DIMS {
            return Err(EngineError::InvalidDimension {
                expected: coords.len().clamp(2, MAX_DIMS),
                actual: coords.len(),
            });
        }
        let mut cell = Cell {
            coords: [0; MAX_DIMS],
            dims: coords.len() as u8,
        };
        cell.coords[..coords.len()].copy_from_slice(coords);
        Ok(cell)
    }

    pub const fn d2(row: i32, col: i32) -> Self {
        Cell {
            coords: [row, col, 0],
            dims: 2,
        }
    }

    pub const fn d3(row: i32, col: i32, layer: i32) -> Self {
        Cell {
            coords: [row, col, layer],
            dims: 3,
        }
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.dims as usize
    }

    #[inline]
    pub fn coords(&self) -> &[i32] {
        &self.coords[..self.dims as usize]
    }

    #[inline]
    pub fn get(&self, axis: usize) -> i32 {
        self.coords[axis]
    }

    /// This cell moved by `delta` along `axis`.
    pub fn offset(&self, axis: usize, delta: i32) -> Self {
        let mut moved = *self;
        moved.coords[axis] += delta;
        moved
    }
}

impl TryFrom<Vec<i32>> for Cell {
    type Error = EngineError;

    fn try_from(coords: Vec<i32>) -> Result<Self> {
        Cell::new(&coords)
    }
}

impl From<Cell> for Vec<i32> {
    fn from(cell: Cell) -> Self {
        cell.coords().to_vec()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.coords().iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// In-bounds orthogonal (face-adjacent) neighbors of `cell`.
///
/// Order is axis-major, negative before positive.
pub fn neighbors(cell: &Cell, shape: &GridShape) -> Result<Vec<Cell>> {
    shape.check_dims(cell)?;

    let mut out = Vec::with_capacity(2 * shape.dims());
    for axis in 0..shape.dims() {
        for delta in [-1, 1] {
            let next = cell.offset(axis, delta);
            if shape.in_bounds(&next) {
                out.push(next);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_shape() {
        let shape = GridShape::new(&[8, 8, 8]).unwrap();
        assert_eq!(shape.dims(), 3);
        assert_eq!(shape.extents(), &[8, 8, 8]);
        assert_eq!(shape.volume(), 512);

        let flat = GridShape::new(&[3, 5]).unwrap();
        assert_eq!(flat.volume(), 15);
        assert_eq!(flat.to_string(), "3x5");
    }

    #[test]
    fn test_shape_rejects_bad_input() {
        assert!(matches!(
            GridShape::new(&[4]),
            Err(EngineError::InvalidDimension { actual: 1, .. })
        ));
        assert!(matches!(
            GridShape::new(&[4, 4, 4, 4]),
            Err(EngineError::InvalidDimension { actual: 4, .. })
        ));
        assert!(matches!(
            GridShape::new(&[4, 0]),
            Err(EngineError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_shape_rejects_oversized_extents() {
        assert!(matches!(
            GridShape::new(&[1 << 22, 1 << 22, 1 << 22]),
            Err(EngineError::InvalidShape(_))
        ));
        assert!(matches!(
            GridShape::new(&[usize::MAX, 2]),
            Err(EngineError::InvalidShape(_))
        ));
        assert!(matches!(
            GridShape::new(&[i32::MAX as usize + 1, 1]),
            Err(EngineError::InvalidShape(_))
        ));

        let wide = GridShape::new(&[1 << 20, 1 << 10]).unwrap();
        assert_eq!(wide.volume(), 1 << 30);
    }

    #[test]
    fn test_index_of() {
        let shape = GridShape::cube(4).unwrap();

        // First cell
        assert_eq!(shape.index_of(&Cell::d3(0, 0, 0)), 0);
        // Last cell
        assert_eq!(shape.index_of(&Cell::d3(3, 3, 3)), 63);
        // First axis is fastest
        assert_eq!(shape.index_of(&Cell::d3(1, 0, 0)), 1);
        assert_eq!(shape.index_of(&Cell::d3(0, 1, 0)), 4);
        assert_eq!(shape.index_of(&Cell::d3(0, 0, 1)), 16);

        for i in 0..shape.volume() {
            assert_eq!(shape.index_of(&shape.cell_at(i)), i);
        }
    }

    #[test]
    fn test_in_bounds() {
        let shape = GridShape::cube(4).unwrap();

        assert!(shape.in_bounds(&Cell::d3(0, 0, 0)));
        assert!(shape.in_bounds(&Cell::d3(3, 3, 3)));
        assert!(shape.in_bounds(&Cell::d3(2, 2, 2)));

        assert!(!shape.in_bounds(&Cell::d3(-1, 0, 0)));
        assert!(!shape.in_bounds(&Cell::d3(4, 0, 0)));
        assert!(!shape.in_bounds(&Cell::d3(0, -1, 0)));
        assert!(!shape.in_bounds(&Cell::d3(0, 4, 0)));
        assert!(!shape.in_bounds(&Cell::d3(0, 0, -1)));
        assert!(!shape.in_bounds(&Cell::d3(0, 0, 4)));

        // Rank mismatch is never in bounds
        assert!(!shape.in_bounds(&Cell::d2(1, 1)));
    }

    #[test]
    fn test_neighbors_interior_and_order() {
        let shape = GridShape::square(4).unwrap();
        let got = neighbors(&Cell::d2(1, 2), &shape).unwrap();
        assert_eq!(
            got,
            vec![
                Cell::d2(0, 2),
                Cell::d2(2, 2),
                Cell::d2(1, 1),
                Cell::d2(1, 3)
            ]
        );

        let cube = GridShape::cube(3).unwrap();
        assert_eq!(neighbors(&Cell::d3(1, 1, 1), &cube).unwrap().len(), 6);
    }

    #[test]
    fn test_neighbors_boundary() {
        let shape = GridShape::square(4).unwrap();
        assert_eq!(neighbors(&Cell::d2(0, 0), &shape).unwrap().len(), 2);
        assert_eq!(neighbors(&Cell::d2(0, 2), &shape).unwrap().len(), 3);
        assert_eq!(neighbors(&Cell::d2(3, 3), &shape).unwrap().len(), 2);

        let cube = GridShape::cube(3).unwrap();
        assert_eq!(neighbors(&Cell::d3(0, 0, 0), &cube).unwrap().len(), 3);
        assert_eq!(neighbors(&Cell::d3(0, 1, 1), &cube).unwrap().len(), 5);

        for cell in cube.cells() {
            for n in neighbors(&cell, &cube).unwrap() {
                assert!(cube.in_bounds(&n), "{n} escaped the grid");
            }
        }
    }

    #[test]
    fn test_neighbors_dimension_mismatch() {
        let shape = GridShape::square(4).unwrap();
        assert!(matches!(
            neighbors(&Cell::d3(1, 1, 1), &shape),
            Err(EngineError::InvalidDimension {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_neighbor_indices_match_neighbors() {
        for shape in [GridShape::new(&[3, 5]).unwrap(), GridShape::new(&[2, 3, 4]).unwrap()] {
            for i in 0..shape.volume() {
                let by_index: Vec<Cell> =
                    shape.neighbor_indices(i).map(|n| shape.cell_at(n)).collect();
                assert_eq!(by_index, neighbors(&shape.cell_at(i), &shape).unwrap());
            }
        }
    }

    #[test]
    fn test_cell_serde() {
        let cell: Cell = serde_json::from_str("[4, 5]").unwrap();
        assert_eq!(cell, Cell::d2(4, 5));
        assert_eq!(serde_json::to_string(&Cell::d3(1, 2, 3)).unwrap(), "[1,2,3]");
        assert!(serde_json::from_str::<Cell>("[1]").is_err());
    }
}

//! The 2D cell array backing a map

use crate::{CellRect, GridSize};
use serde::{Deserialize, Serialize};

/// Cell value meaning "no tile here"
pub const EMPTY_CELL: i32 = -1;

/// A rectangular grid of cells, each holding a palette index or [`EMPTY_CELL`]
///
/// Cells are stored flat in row-major order (`index = col + row * cols`).
/// `cells.len() == rows * cols` holds at all times.
///
/// `get`/`set` treat out-of-bounds coordinates as a programming error and
/// panic; clamping out-of-range input is the selection's job, not the grid's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGrid {
    rows: u32,
    cols: u32,
    cells: Vec<i32>,
}

impl Default for MapGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl MapGrid {
    /// Create an empty 0x0 grid
    pub fn new() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
        }
    }

    /// Build a grid from already-validated parts
    ///
    /// Panics if `cells.len() != rows * cols`.
    pub fn from_cells(rows: u32, cols: u32, cells: Vec<i32>) -> Self {
        assert_eq!(
            cells.len(),
            (rows * cols) as usize,
            "cell count does not match {}x{} grid",
            rows,
            cols
        );
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.rows, self.cols)
    }

    /// Raw cell slice in row-major order, for render passes
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Resize the grid, preserving the top-left-aligned overlap
    ///
    /// New cells start empty. Cells outside the overlap with the old extent
    /// are lost. Resizing to the current size is a cheap no-op.
    pub fn resize(&mut self, rows: u32, cols: u32) {
        if rows == self.rows && cols == self.cols {
            return;
        }

        let mut cells = vec![EMPTY_CELL; (rows * cols) as usize];
        let copy_rows = rows.min(self.rows);
        let copy_cols = cols.min(self.cols);
        for row in 0..copy_rows {
            for col in 0..copy_cols {
                cells[(col + row * cols) as usize] = self.cells[(col + row * self.cols) as usize];
            }
        }

        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.cols && y < self.rows,
            "cell ({}, {}) out of bounds for {}x{} grid",
            x,
            y,
            self.rows,
            self.cols
        );
        (x + y * self.cols) as usize
    }

    /// Get the cell at column `x`, row `y`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> i32 {
        self.cells[self.index(x, y)]
    }

    /// Set the cell at column `x`, row `y`. Panics when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: i32) {
        let idx = self.index(x, y);
        self.cells[idx] = value;
    }

    /// Set every cell in `rect` to `value`
    ///
    /// `rect` must already be clipped to the grid bounds.
    pub fn fill_rect(&mut self, rect: CellRect, value: i32) {
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                let idx = self.index(x, y);
                self.cells[idx] = value;
            }
        }
    }

    /// The single value held by every cell in `rect`, or `None` when mixed
    ///
    /// `rect` must already be clipped to the grid bounds.
    pub fn uniform_value(&self, rect: CellRect) -> Option<i32> {
        let first = self.get(rect.x, rect.y);
        for y in rect.y..rect.y + rect.h {
            for x in rect.x..rect.x + rect.w {
                if self.get(x, y) != first {
                    return None;
                }
            }
        }
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = MapGrid::new();
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert!(grid.cells().is_empty());
    }

    #[test]
    fn test_resize_fills_with_empty() {
        let mut grid = MapGrid::new();
        grid.resize(2, 3);
        assert_eq!(grid.cells(), &[EMPTY_CELL; 6]);
    }

    #[test]
    fn test_resize_preserves_overlap() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.set(0, 0, 5);
        grid.set(1, 0, 6);
        grid.set(0, 1, 7);
        grid.set(1, 1, 8);

        // Grow: old values stay in the top-left corner.
        grid.resize(3, 4);
        assert_eq!(grid.get(0, 0), 5);
        assert_eq!(grid.get(1, 0), 6);
        assert_eq!(grid.get(0, 1), 7);
        assert_eq!(grid.get(1, 1), 8);
        assert_eq!(grid.get(2, 0), EMPTY_CELL);
        assert_eq!(grid.get(3, 2), EMPTY_CELL);

        // Shrink: cells outside the new extent are lost for good.
        grid.resize(1, 2);
        assert_eq!(grid.cells(), &[5, 6]);
        grid.resize(2, 2);
        assert_eq!(grid.get(0, 1), EMPTY_CELL);
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.set(1, 1, 3);
        grid.resize(2, 2);
        assert_eq!(grid.get(1, 1), 3);
    }

    #[test]
    fn test_resize_to_zero() {
        let mut grid = MapGrid::new();
        grid.resize(3, 3);
        grid.resize(0, 3);
        assert!(grid.cells().is_empty());
        assert_eq!(grid.size(), GridSize::new(0, 3));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.get(2, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_out_of_bounds_panics() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.set(0, 2, 1);
    }

    #[test]
    fn test_fill_rect() {
        let mut grid = MapGrid::new();
        grid.resize(3, 3);
        grid.fill_rect(CellRect::new(1, 1, 2, 2), 4);
        assert_eq!(
            grid.cells(),
            &[-1, -1, -1, -1, 4, 4, -1, 4, 4]
        );
    }

    #[test]
    fn test_uniform_value_single_cell() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.set(1, 0, 9);
        assert_eq!(grid.uniform_value(CellRect::new(1, 0, 1, 1)), Some(9));
        assert_eq!(grid.uniform_value(CellRect::new(0, 0, 1, 1)), Some(EMPTY_CELL));
    }

    #[test]
    fn test_uniform_value_mixed() {
        let mut grid = MapGrid::new();
        grid.resize(2, 2);
        grid.set(0, 0, 1);
        assert_eq!(grid.uniform_value(CellRect::new(0, 0, 2, 2)), None);
        assert_eq!(grid.uniform_value(CellRect::new(0, 1, 2, 1)), Some(EMPTY_CELL));
    }

    #[test]
    #[should_panic]
    fn test_from_cells_length_mismatch_panics() {
        MapGrid::from_cells(2, 2, vec![0; 3]);
    }
}

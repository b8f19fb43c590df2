//! Cell-space geometry shared by the grid and the selection

use serde::{Deserialize, Serialize};

/// A position in cell coordinates
///
/// Coordinates are signed: selection anchors may sit outside the grid and
/// are only clamped when a rectangle is realized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grid extent in rows and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// True when the grid has no cells in at least one dimension
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// True when `cell` lies inside `[0, cols) x [0, rows)`
    pub fn contains(&self, cell: CellPos) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.cols && (cell.y as u32) < self.rows
    }
}

/// An axis-aligned rectangle of cells: in-bounds origin plus non-zero extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CellRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// True when this rectangle covers the whole of `size`
    pub fn covers(&self, size: GridSize) -> bool {
        self.x == 0 && self.y == 0 && self.w == size.cols && self.h == size.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let size = GridSize::new(3, 5);
        assert!(size.contains(CellPos::new(0, 0)));
        assert!(size.contains(CellPos::new(4, 2)));
        assert!(!size.contains(CellPos::new(5, 2)));
        assert!(!size.contains(CellPos::new(4, 3)));
        assert!(!size.contains(CellPos::new(-1, 0)));
    }

    #[test]
    fn test_empty_size_contains_nothing() {
        let size = GridSize::new(0, 5);
        assert!(size.is_empty());
        assert!(!size.contains(CellPos::new(0, 0)));
    }

    #[test]
    fn test_covers() {
        let size = GridSize::new(3, 5);
        assert!(CellRect::new(0, 0, 5, 3).covers(size));
        assert!(!CellRect::new(0, 0, 5, 2).covers(size));
        assert!(!CellRect::new(1, 0, 4, 3).covers(size));
    }
}

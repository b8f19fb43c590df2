//! Rectangular selection with begin/end anchor semantics
//!
//! A selection is driven by two anchors: `begin` is placed when a drag
//! starts, `end` when it finishes. Anchors are kept raw (they may lie outside
//! the grid); realizing the rectangle clamps the origin into bounds while
//! taking the extent from the unclipped distance between the anchors, then
//! re-clips the extent. A drag that ends far outside the grid therefore still
//! yields a full-size rectangle hugging the clamped edge.

use crate::{CellPos, CellRect, GridSize};

/// The selection state of a map document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionRegion {
    /// Nothing selected
    #[default]
    Unselected,
    /// Drag started, not yet committed; the live rectangle follows the cursor
    InProgress { begin: CellPos },
    /// Both anchors placed
    Committed { begin: CellPos, end: CellPos },
}

/// Realize the rectangle spanned by two anchors against `bounds`
///
/// Origin is the clamped min corner; width/height come from the raw anchor
/// distance and are then clipped to the grid.
fn realize(begin: CellPos, end: CellPos, bounds: GridSize) -> Option<CellRect> {
    if bounds.is_empty() {
        return None;
    }

    let x0 = begin.x.min(end.x);
    let y0 = begin.y.min(end.y);
    let w = begin.x.abs_diff(end.x) + 1;
    let h = begin.y.abs_diff(end.y) + 1;

    let x = x0.clamp(0, bounds.cols as i32 - 1) as u32;
    let y = y0.clamp(0, bounds.rows as i32 - 1) as u32;

    Some(CellRect::new(x, y, w.min(bounds.cols - x), h.min(bounds.rows - y)))
}

impl SelectionRegion {
    pub fn new() -> Self {
        Self::Unselected
    }

    /// Start a fresh selection anchored at `cell`
    ///
    /// `cell` may be any coordinate, including out of bounds. Any previously
    /// committed end anchor is discarded.
    pub fn begin(&mut self, cell: CellPos) {
        *self = Self::InProgress { begin: cell };
    }

    /// Commit the selection with `cell` as the end anchor
    ///
    /// Clears the selection when the grid is 0-sized in either dimension, or
    /// when `cell` is out of bounds and equal to the stored begin (a click
    /// outside the grid with no drag). Without a pending begin this is a
    /// no-op.
    pub fn commit(&mut self, cell: CellPos, bounds: GridSize) {
        let begin = match *self {
            Self::Unselected => return,
            Self::InProgress { begin } => begin,
            Self::Committed { begin, .. } => begin,
        };

        if bounds.is_empty() || (!bounds.contains(cell) && cell == begin) {
            *self = Self::Unselected;
        } else {
            *self = Self::Committed { begin, end: cell };
        }
    }

    /// Toggle between a full-grid selection and no selection
    ///
    /// If the committed rectangle already covers the whole grid, the
    /// selection is cleared; otherwise the whole grid becomes selected.
    pub fn select_all(&mut self, bounds: GridSize) {
        if bounds.is_empty() {
            *self = Self::Unselected;
            return;
        }

        let full = self
            .rectangle(bounds)
            .map(|r| r.covers(bounds))
            .unwrap_or(false);
        if full {
            *self = Self::Unselected;
        } else {
            *self = Self::Committed {
                begin: CellPos::new(0, 0),
                end: CellPos::new(bounds.cols as i32 - 1, bounds.rows as i32 - 1),
            };
        }
    }

    /// Unconditionally empty the selection
    pub fn clear(&mut self) {
        *self = Self::Unselected;
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress { .. })
    }

    /// The realized rectangle, or `None` when unselected or in progress
    pub fn rectangle(&self, bounds: GridSize) -> Option<CellRect> {
        match *self {
            Self::Committed { begin, end } => realize(begin, end, bounds),
            _ => None,
        }
    }

    /// The rectangle the selection would have if committed at `cursor`
    ///
    /// Pure preview for live feedback while a drag is in progress; the
    /// stored state is not touched. `None` unless a begin anchor is pending.
    pub fn preview_rectangle(&self, cursor: CellPos, bounds: GridSize) -> Option<CellRect> {
        match *self {
            Self::InProgress { begin } => realize(begin, cursor, bounds),
            _ => None,
        }
    }
}

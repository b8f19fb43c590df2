//! The map document: grid + palette + selection behind one editing API

use crate::codec;
use crate::events::{DocumentEvent, EventHub};
use maped_core::{CellPos, CellRect, GridSize, MapError, MapGrid, SelectionRegion, TilePalette, EMPTY_CELL};
use std::path::{Path, PathBuf};

/// Zoom floor; wheel zoom never shrinks the view past this
const MIN_SCALE: f32 = 1e-4;
/// Wheel-delta-to-scale divisor
const WHEEL_ZOOM_STEP: f32 = 500.0;

/// A complete editable map: cell grid, tile palette, selection, and the
/// viewport bookkeeping a render pass reads
///
/// Mutators run synchronously on the calling thread and notify subscribers
/// through the event hub; queries are pure. Editing operations invoked with
/// no committed selection are silent no-ops.
pub struct MapDocument {
    grid: MapGrid,
    palette: TilePalette,
    selection: SelectionRegion,
    viewport_pos: (f32, f32),
    scale: f32,
    cell_under_cursor: Option<CellPos>,
    events: EventHub,
}

impl Default for MapDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MapDocument {
    /// Create an empty document: 0x0 grid, no tiles, nothing selected
    pub fn new() -> Self {
        Self {
            grid: MapGrid::new(),
            palette: TilePalette::new(),
            selection: SelectionRegion::new(),
            viewport_pos: (0.0, 0.0),
            scale: 1.0,
            cell_under_cursor: None,
            events: EventHub::new(),
        }
    }

    pub fn grid(&self) -> &MapGrid {
        &self.grid
    }

    pub fn palette(&self) -> &TilePalette {
        &self.palette
    }

    pub fn row_count(&self) -> u32 {
        self.grid.rows()
    }

    pub fn col_count(&self) -> u32 {
        self.grid.cols()
    }

    fn bounds(&self) -> GridSize {
        self.grid.size()
    }

    /// True when `cell` lies inside the grid
    pub fn contains_cell(&self, cell: CellPos) -> bool {
        self.bounds().contains(cell)
    }

    // --- events -----------------------------------------------------------

    /// Subscribe to selection and status notifications
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Run `f` with event delivery muted
    ///
    /// For callers that need to push state into the document without waking
    /// their own change handlers.
    pub fn with_notifications_suppressed(&mut self, f: impl FnOnce(&mut Self)) {
        let was_muted = self.events.is_muted();
        self.events.set_muted(true);
        f(self);
        self.events.set_muted(was_muted);
    }

    // --- map editing ------------------------------------------------------

    /// Reset to an empty map, keeping the loaded palette
    pub fn new_map(&mut self) {
        self.grid = MapGrid::new();
        self.selection.clear();
        self.cell_under_cursor = None;
        self.viewport_pos = (0.0, 0.0);
        self.scale = 1.0;
        self.events.emit(DocumentEvent::SelectionCleared);
        self.events.emit(DocumentEvent::Status("new map".into()));
    }

    /// Resize the grid, preserving the top-left overlap
    pub fn resize_map(&mut self, rows: u32, cols: u32) {
        self.grid.resize(rows, cols);
    }

    /// Fill the committed selection with `tile_index`
    ///
    /// The index is trusted: the UI hands out indices straight from the
    /// palette, and load-time validation covers persisted maps.
    pub fn paint_selected(&mut self, tile_index: i32) {
        if let Some(rect) = self.selection.rectangle(self.bounds()) {
            self.grid.fill_rect(rect, tile_index);
        }
    }

    /// Empty every cell in the committed selection
    pub fn erase_selected(&mut self) {
        if let Some(rect) = self.selection.rectangle(self.bounds()) {
            self.grid.fill_rect(rect, EMPTY_CELL);
        }
    }

    /// The tile index every selected cell shares, or -1
    ///
    /// -1 covers three cases the format does not tell apart: no selection,
    /// all cells empty, and mixed values.
    pub fn selected_tile(&self) -> i32 {
        match self.selection.rectangle(self.bounds()) {
            Some(rect) => self.grid.uniform_value(rect).unwrap_or(EMPTY_CELL),
            None => EMPTY_CELL,
        }
    }

    /// Width and height of the committed selection, `(0, 0)` when none
    pub fn selection_extent(&self) -> (u32, u32) {
        self.selection
            .rectangle(self.bounds())
            .map(|r| (r.width(), r.height()))
            .unwrap_or((0, 0))
    }

    // --- selection plumbing -----------------------------------------------

    /// Start a selection drag at `cell`
    pub fn begin_selection(&mut self, cell: CellPos) {
        self.selection.begin(cell);
    }

    /// Finish a selection drag at `cell`
    pub fn commit_selection(&mut self, cell: CellPos) {
        let had_anchor = !matches!(self.selection, SelectionRegion::Unselected);
        self.selection.commit(cell, self.bounds());
        if self.selection.is_committed() {
            self.events.emit(DocumentEvent::SelectionChanged);
        } else if had_anchor {
            self.events.emit(DocumentEvent::SelectionCleared);
        }
    }

    /// Toggle between a full-grid selection and no selection
    pub fn select_all(&mut self) {
        self.selection.select_all(self.bounds());
        if self.selection.is_committed() {
            self.events.emit(DocumentEvent::SelectionChanged);
        } else {
            self.events.emit(DocumentEvent::SelectionCleared);
        }
    }

    /// Drop the selection entirely
    pub fn clear_selection(&mut self) {
        if !matches!(self.selection, SelectionRegion::Unselected) {
            self.selection.clear();
            self.events.emit(DocumentEvent::SelectionCleared);
        }
    }

    /// The committed selection rectangle, clipped to the grid
    pub fn selection_rectangle(&self) -> Option<CellRect> {
        self.selection.rectangle(self.bounds())
    }

    /// Live rectangle while a drag is in progress, with the cursor as the
    /// provisional end anchor
    pub fn preview_rectangle(&self, cursor: CellPos) -> Option<CellRect> {
        self.selection.preview_rectangle(cursor, self.bounds())
    }

    // --- palette ----------------------------------------------------------

    /// Replace the palette with the tiles found in `dir`
    pub fn load_tiles_from_dir(&mut self, dir: &Path) -> Result<(), MapError> {
        let skipped = self.palette.load_from_dir(dir)?;
        self.emit_palette_status(self.palette.len(), &skipped);
        Ok(())
    }

    /// Append tile files to the palette
    pub fn add_tile_files(&mut self, paths: &[PathBuf]) -> Result<(), MapError> {
        let skipped = self.palette.add_files(paths)?;
        self.emit_palette_status(self.palette.len(), &skipped);
        Ok(())
    }

    fn emit_palette_status(&mut self, total: usize, skipped: &[PathBuf]) {
        let message = if skipped.is_empty() {
            format!("{} tiles in palette", total)
        } else {
            format!("{} tiles in palette, {} files skipped", total, skipped.len())
        };
        self.events.emit(DocumentEvent::Status(message));
    }

    // --- viewport / cursor ------------------------------------------------

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(MIN_SCALE);
    }

    /// Apply a mouse-wheel delta to the zoom level
    pub fn zoom_by(&mut self, wheel_delta: f32) {
        self.set_scale(self.scale + wheel_delta / WHEEL_ZOOM_STEP);
    }

    pub fn viewport_pos(&self) -> (f32, f32) {
        self.viewport_pos
    }

    /// Accumulate a pan offset (middle-button drag)
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport_pos.0 += dx;
        self.viewport_pos.1 += dy;
    }

    /// Map a widget-space point to the cell under it
    ///
    /// `None` until a palette fixes the tile size. Truncates toward zero,
    /// so points slightly left/above the origin land in column/row 0.
    pub fn cell_at_point(&self, px: f32, py: f32) -> Option<CellPos> {
        let (tile_w, tile_h) = self.palette.tile_size()?;
        let gx = px - self.viewport_pos.0;
        let gy = py - self.viewport_pos.1;
        Some(CellPos::new(
            (gx / tile_w as f32) as i32,
            (gy / tile_h as f32) as i32,
        ))
    }

    pub fn cell_under_cursor(&self) -> Option<CellPos> {
        self.cell_under_cursor
    }

    /// Update the hover cell; returns true when it changed (the caller only
    /// repaints on change)
    pub fn set_cursor_cell(&mut self, cell: Option<CellPos>) -> bool {
        if self.cell_under_cursor == cell {
            return false;
        }
        self.cell_under_cursor = cell;
        true
    }

    // --- persistence ------------------------------------------------------

    /// Save to `path`; the extension picks the encoding (`.json` is text)
    pub fn save(&mut self, path: &Path) -> Result<(), MapError> {
        codec::save_document(&self.grid, &self.palette, path)?;
        self.events
            .emit(DocumentEvent::Status(format!("saved {}", path.display())));
        Ok(())
    }

    /// Load from `path`, replacing the whole document state at once
    ///
    /// Validation runs to completion before anything is touched; on failure
    /// the document is exactly as it was. On success the selection,
    /// viewport, scale and hover cell reset to defaults.
    pub fn load(&mut self, path: &Path) -> Result<(), MapError> {
        let loaded = codec::load_document(path)?;

        self.grid = loaded.grid;
        self.palette = loaded.palette;
        self.selection.clear();
        self.cell_under_cursor = None;
        self.viewport_pos = (0.0, 0.0);
        self.scale = 1.0;

        self.events.emit(DocumentEvent::SelectionCleared);
        self.events
            .emit(DocumentEvent::Status(format!("loaded {}", path.display())));
        Ok(())
    }
}

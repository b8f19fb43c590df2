//! Core data structures for the maped tile map editor
//!
//! This crate provides the fundamental types for representing a tile map:
//! - `MapGrid` - The 2D cell array with overlap-preserving resize
//! - `SelectionRegion` - Rectangular selection with anchor/clip semantics
//! - `Tile` / `TilePalette` - Fixed-size tile images loaded from disk
//! - `MapError` - Shared error type for validation, I/O and decode failures
//!
//! Rendering, windowing and input routing live outside this workspace; these
//! types only hold state and answer queries, so a render pass can read them
//! freely without side effects.

mod error;
mod geom;
mod grid;
mod selection;
mod tileset;

pub use error::MapError;
pub use geom::{CellPos, CellRect, GridSize};
pub use grid::{MapGrid, EMPTY_CELL};
pub use selection::SelectionRegion;
pub use tileset::{Tile, TilePalette, TILE_EXTENSIONS};

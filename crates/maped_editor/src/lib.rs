//! Headless editing layer for the maped tile map editor
//!
//! `MapDocument` composes the core grid, palette and selection into the API
//! a UI calls: fill/erase the selection, query the selected tile, pan/zoom
//! bookkeeping, and load/save through `codec`. Subscribers on the document's
//! event hub receive selection-change and status notifications for repaints
//! and the status bar; no drawing happens here.

pub mod codec;
mod document;
mod events;

pub use codec::MapEncoding;
pub use document::MapDocument;
pub use events::{DocumentEvent, EventHub};

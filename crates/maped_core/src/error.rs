//! Shared error type for map loading, saving and tile decoding

/// Errors surfaced by map and palette operations
///
/// Editing operations invoked with no selection are silent no-ops by
/// contract, not errors, so there is no variant for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Malformed or inconsistent map data (missing field, wrong type,
    /// out-of-range tile reference, non-consecutive tile keys, ...)
    Validation(String),
    /// File open/read/write failure
    Io(String),
    /// Unreadable or size-mismatched tile image
    Decode(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Validation(e) => write!(f, "Validation error: {}", e),
            MapError::Io(e) => write!(f, "IO error: {}", e),
            MapError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for MapError {}

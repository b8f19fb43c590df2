//! Map file save/load
//!
//! One logical schema, two physical encodings selected by the file
//! extension: `.json` is pretty-printed JSON text, anything else is the
//! bincode form of the same object:
//!
//! ```text
//! {
//!   "rows": <int>,
//!   "cols": <int>,
//!   "tiles": { "0": "<name>", "1": "<name>", ... },
//!   "cells": [ <int>, ... ]   // rows*cols values, index = col + row*cols
//! }
//! ```
//!
//! Loading is a strict validation pipeline: every structural and referential
//! check runs before any state is built, so a failed load can never leave a
//! document half-replaced. Tile names resolve relative to the map file's
//! directory.

use maped_core::{MapError, MapGrid, Tile, TilePalette};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Physical encoding of a map file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEncoding {
    /// Pretty-printed JSON text (`.json`)
    Text,
    /// bincode over the same schema (any other extension)
    Binary,
}

impl MapEncoding {
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::Text
        } else {
            Self::Binary
        }
    }
}

/// Grid and palette produced by a successful load, ready to swap in
#[derive(Debug)]
pub struct LoadedMap {
    pub grid: MapGrid,
    pub palette: TilePalette,
}

/// The schema as serialized; the binary encoding is bincode over this struct
#[derive(Debug, Serialize, Deserialize)]
struct RawMap {
    rows: i64,
    cols: i64,
    tiles: BTreeMap<String, String>,
    cells: Vec<i64>,
}

/// Serialize a grid + palette into the chosen encoding
pub fn encode(
    grid: &MapGrid,
    palette: &TilePalette,
    encoding: MapEncoding,
) -> Result<Vec<u8>, MapError> {
    match encoding {
        MapEncoding::Text => {
            let mut tiles = serde_json::Map::new();
            for (index, tile) in palette.iter().enumerate() {
                tiles.insert(index.to_string(), Value::from(tile.file_name.clone()));
            }

            let mut map = serde_json::Map::new();
            map.insert("rows".into(), Value::from(grid.rows()));
            map.insert("cols".into(), Value::from(grid.cols()));
            map.insert("tiles".into(), Value::Object(tiles));
            map.insert("cells".into(), Value::from(grid.cells().to_vec()));

            serde_json::to_string_pretty(&Value::Object(map))
                .map(String::into_bytes)
                .map_err(|e| MapError::Validation(format!("cannot serialize map: {}", e)))
        }
        MapEncoding::Binary => {
            let raw = RawMap {
                rows: grid.rows() as i64,
                cols: grid.cols() as i64,
                tiles: palette
                    .iter()
                    .enumerate()
                    .map(|(index, tile)| (index.to_string(), tile.file_name.clone()))
                    .collect(),
                cells: grid.cells().iter().map(|&c| c as i64).collect(),
            };
            bincode::serialize(&raw)
                .map_err(|e| MapError::Validation(format!("cannot serialize map: {}", e)))
        }
    }
}

/// Deserialize and fully validate a map, resolving tile names against
/// `base_dir`
///
/// Fails fast with a message naming the offending field or constraint; no
/// state is built until every check has passed.
pub fn decode(bytes: &[u8], encoding: MapEncoding, base_dir: &Path) -> Result<LoadedMap, MapError> {
    if bytes.is_empty() {
        return Err(MapError::Validation("map file is empty".into()));
    }

    let (rows, cols, tiles, cells) = match encoding {
        MapEncoding::Text => parse_text(bytes)?,
        MapEncoding::Binary => parse_binary(bytes)?,
    };
    validate(rows, cols, tiles, cells, base_dir)
}

/// Step-wise extraction from the JSON text form, one message per field
fn parse_text(bytes: &[u8]) -> Result<(i64, i64, Vec<(usize, String)>, Vec<i64>), MapError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| MapError::Validation(format!("cannot parse map file: {}", e)))?;
    let obj = value
        .as_object()
        .ok_or_else(|| MapError::Validation("top-level value is not an object".into()))?;

    let rows = require_int(obj, "rows")?;
    let cols = require_int(obj, "cols")?;

    let tiles_value = obj
        .get("tiles")
        .ok_or_else(|| MapError::Validation("missing field 'tiles'".into()))?;
    let tiles_obj = tiles_value
        .as_object()
        .ok_or_else(|| MapError::Validation("field 'tiles' is not an object".into()))?;
    let mut tiles = Vec::with_capacity(tiles_obj.len());
    for (key, value) in tiles_obj {
        let index = key.parse::<usize>().map_err(|_| {
            MapError::Validation(format!("tile key '{}' is not a non-negative integer", key))
        })?;
        let name = value.as_str().ok_or_else(|| {
            MapError::Validation(format!("tile '{}' is not a string", key))
        })?;
        tiles.push((index, name.to_owned()));
    }

    let cells_value = obj
        .get("cells")
        .ok_or_else(|| MapError::Validation("missing field 'cells'".into()))?;
    let cells_arr = cells_value
        .as_array()
        .ok_or_else(|| MapError::Validation("field 'cells' is not an array".into()))?;
    let mut cells = Vec::with_capacity(cells_arr.len());
    for (i, value) in cells_arr.iter().enumerate() {
        let cell = as_int(value)
            .ok_or_else(|| MapError::Validation(format!("cells[{}] is not a number", i)))?;
        cells.push(cell);
    }

    Ok((rows, cols, tiles, cells))
}

fn parse_binary(bytes: &[u8]) -> Result<(i64, i64, Vec<(usize, String)>, Vec<i64>), MapError> {
    let raw: RawMap = bincode::deserialize(bytes)
        .map_err(|e| MapError::Validation(format!("cannot parse binary map file: {}", e)))?;
    let mut tiles = Vec::with_capacity(raw.tiles.len());
    for (key, name) in raw.tiles {
        let index = key.parse::<usize>().map_err(|_| {
            MapError::Validation(format!("tile key '{}' is not a non-negative integer", key))
        })?;
        tiles.push((index, name));
    }
    Ok((raw.rows, raw.cols, tiles, raw.cells))
}

/// Semantic validation shared by both encodings; builds the replacement
/// state only after everything checks out
fn validate(
    rows: i64,
    cols: i64,
    mut tiles: Vec<(usize, String)>,
    cells: Vec<i64>,
    base_dir: &Path,
) -> Result<LoadedMap, MapError> {
    let rows = int_to_dim(rows, "rows")?;
    let cols = int_to_dim(cols, "cols")?;

    tiles.sort_by_key(|(index, _)| *index);
    for (position, (index, _)) in tiles.iter().enumerate() {
        if *index != position {
            return Err(MapError::Validation(format!(
                "tile keys must be consecutive from 0: expected {}, found {}",
                position, index
            )));
        }
    }

    let mut tile_size = None;
    let mut palette_tiles = Vec::with_capacity(tiles.len());
    for (index, name) in &tiles {
        let path = {
            let p = Path::new(name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base_dir.join(p)
            }
        };
        let image = image::open(&path)
            .map_err(|e| MapError::Decode(format!("cannot decode tile '{}': {}", name, e)))?
            .to_rgba8();

        let dims = image.dimensions();
        match tile_size {
            None => tile_size = Some(dims),
            Some(expected) if expected != dims => {
                return Err(MapError::Decode(format!(
                    "tile '{}' (key {}) is {}x{}, expected {}x{}",
                    name, index, dims.0, dims.1, expected.0, expected.1
                )));
            }
            Some(_) => {}
        }
        palette_tiles.push(Tile::new(name.clone(), image));
    }

    let expected_len = rows as u64 * cols as u64;
    if cells.len() as u64 != expected_len {
        return Err(MapError::Validation(format!(
            "'cells' has {} entries, expected {} ({} rows x {} cols)",
            cells.len(),
            expected_len,
            rows,
            cols
        )));
    }
    let mut grid_cells = Vec::with_capacity(cells.len());
    for (i, &cell) in cells.iter().enumerate() {
        if cell < -1 || cell >= palette_tiles.len() as i64 {
            return Err(MapError::Validation(format!(
                "cells[{}] references tile {} but only {} tiles are defined",
                i,
                cell,
                palette_tiles.len()
            )));
        }
        if cell >= 0 && !palette_tiles[cell as usize].is_valid() {
            return Err(MapError::Validation(format!(
                "cells[{}] references tile {} which failed to load",
                i, cell
            )));
        }
        grid_cells.push(cell as i32);
    }

    Ok(LoadedMap {
        grid: MapGrid::from_cells(rows, cols, grid_cells),
        palette: TilePalette::from_parts(palette_tiles, tile_size),
    })
}

/// Encode per the destination extension and write with a truncating open
pub fn save_document(grid: &MapGrid, palette: &TilePalette, path: &Path) -> Result<(), MapError> {
    let bytes = encode(grid, palette, MapEncoding::from_path(path))?;
    std::fs::write(path, bytes)
        .map_err(|e| MapError::Io(format!("cannot write {}: {}", path.display(), e)))?;
    log::info!("saved map to {}", path.display());
    Ok(())
}

/// Read, parse and validate a map file
pub fn load_document(path: &Path) -> Result<LoadedMap, MapError> {
    let bytes = std::fs::read(path)
        .map_err(|e| MapError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    decode(&bytes, MapEncoding::from_path(path), base_dir)
}

fn require_int(obj: &serde_json::Map<String, Value>, field: &str) -> Result<i64, MapError> {
    let value = obj
        .get(field)
        .ok_or_else(|| MapError::Validation(format!("missing field '{}'", field)))?;
    as_int(value).ok_or_else(|| MapError::Validation(format!("field '{}' is not a number", field)))
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

fn int_to_dim(value: i64, field: &str) -> Result<u32, MapError> {
    u32::try_from(value)
        .map_err(|_| MapError::Validation(format!("field '{}' is out of range: {}", field, value)))
}

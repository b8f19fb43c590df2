//! Tile palette loading and lookup
//!
//! All tiles in a palette share one pixel size, fixed by the first image
//! that decodes successfully. Unreadable files are skipped with a warning;
//! a size mismatch aborts the whole operation with no partial mutation.

use crate::MapError;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// File extensions considered tile images when scanning a directory
pub const TILE_EXTENSIONS: &[&str] = &["png", "bmp", "jpg", "jpeg"];

/// One palette entry: a fixed-size raster plus its display name
///
/// A tile may be present but invalid (no image), which keeps the palette
/// index space intact while marking the slot unusable; out-of-range lookup
/// is a different condition and yields `None` from [`TilePalette::get`].
#[derive(Debug, Clone)]
pub struct Tile {
    pub image: Option<RgbaImage>,
    pub file_name: String,
}

impl Tile {
    pub fn new(file_name: String, image: RgbaImage) -> Self {
        Self {
            image: Some(image),
            file_name,
        }
    }

    /// A slot that exists but has no usable image
    pub fn invalid(file_name: String) -> Self {
        Self {
            image: None,
            file_name,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.image.is_some()
    }
}

/// Ordered collection of tiles; insertion order is display and index order
#[derive(Debug, Clone, Default)]
pub struct TilePalette {
    tiles: Vec<Tile>,
    tile_size: Option<(u32, u32)>,
}

impl TilePalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from already-validated parts
    pub fn from_parts(tiles: Vec<Tile>, tile_size: Option<(u32, u32)>) -> Self {
        Self { tiles, tile_size }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Pixel size shared by every valid tile, `None` until a tile is loaded
    pub fn tile_size(&self) -> Option<(u32, u32)> {
        self.tile_size
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Iterate tiles in palette/index order, for populating a picker
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Replace the palette with the tile images found in `dir`
    ///
    /// Files matching [`TILE_EXTENSIONS`] are decoded in file-name order.
    /// Returns the paths that were skipped because they failed to decode.
    /// On any error the existing palette is left untouched.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<Vec<PathBuf>, MapError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| MapError::Io(format!("cannot list {}: {}", dir.display(), e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| MapError::Io(format!("cannot list {}: {}", dir.display(), e)))?;
            let path = entry.path();
            let is_tile = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| TILE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false);
            if is_tile {
                paths.push(path);
            }
        }
        paths.sort();

        let (tiles, tile_size, skipped) = decode_batch(&paths, None)?;
        self.tiles = tiles;
        self.tile_size = tile_size;
        Ok(skipped)
    }

    /// Append tile images to the palette
    ///
    /// An empty palette adopts the first decoded file's size. Returns the
    /// paths skipped because they failed to decode; a size mismatch aborts
    /// the whole append with no partial mutation.
    pub fn add_files(&mut self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, MapError> {
        let (tiles, tile_size, skipped) = decode_batch(paths, self.tile_size)?;
        self.tiles.extend(tiles);
        self.tile_size = tile_size;
        Ok(skipped)
    }
}

type DecodedBatch = (Vec<Tile>, Option<(u32, u32)>, Vec<PathBuf>);

/// Decode `paths` sequentially, enforcing one shared tile size
///
/// `expected` carries the size constraint in (for appends); the returned
/// size is the constraint out (fixed by the first decoded image when the
/// input was `None`).
fn decode_batch(
    paths: &[PathBuf],
    expected: Option<(u32, u32)>,
) -> Result<DecodedBatch, MapError> {
    let mut tiles = Vec::new();
    let mut size = expected;
    let mut skipped = Vec::new();

    for path in paths {
        let image = match image::open(path) {
            Ok(image) => image.to_rgba8(),
            Err(e) => {
                log::warn!("cannot read tile {}: {}", path.display(), e);
                skipped.push(path.clone());
                continue;
            }
        };

        let dims = image.dimensions();
        match size {
            None => size = Some(dims),
            Some(expected) if expected != dims => {
                return Err(MapError::Decode(format!(
                    "tile {} is {}x{}, expected {}x{}",
                    path.display(),
                    dims.0,
                    dims.1,
                    expected.0,
                    expected.1
                )));
            }
            Some(_) => {}
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!("loaded tile {} ({}x{})", path.display(), dims.0, dims.1);
        tiles.push(Tile::new(file_name, image));
    }

    Ok((tiles, size, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::TempDir;

    fn write_tile(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::new(w, h).save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_from_dir_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), "b_water.png", 4, 4);
        write_tile(dir.path(), "a_grass.png", 4, 4);

        let mut palette = TilePalette::new();
        let skipped = palette.load_from_dir(dir.path()).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.tile_size(), Some((4, 4)));
        assert_eq!(palette.get(0).unwrap().file_name, "a_grass.png");
        assert_eq!(palette.get(1).unwrap().file_name, "b_water.png");
        assert!(palette.get(2).is_none());
    }

    #[test]
    fn test_load_skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), "good.png", 4, 4);
        std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let mut palette = TilePalette::new();
        let skipped = palette.load_from_dir(dir.path()).unwrap();
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].ends_with("broken.png"));
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn test_load_size_mismatch_leaves_palette_untouched() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), "a.png", 4, 4);

        let mut palette = TilePalette::new();
        palette.load_from_dir(dir.path()).unwrap();

        let other = TempDir::new().unwrap();
        write_tile(other.path(), "a.png", 4, 4);
        write_tile(other.path(), "b.png", 8, 8);
        let err = palette.load_from_dir(other.path()).unwrap_err();
        assert!(matches!(err, MapError::Decode(_)));

        // Prior palette survives the failed reload.
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0).unwrap().file_name, "a.png");
        assert_eq!(palette.tile_size(), Some((4, 4)));
    }

    #[test]
    fn test_add_files_appends() {
        let dir = TempDir::new().unwrap();
        let a = write_tile(dir.path(), "a.png", 4, 4);
        let b = write_tile(dir.path(), "b.png", 4, 4);

        let mut palette = TilePalette::new();
        palette.add_files(&[a]).unwrap();
        assert_eq!(palette.tile_size(), Some((4, 4)));
        palette.add_files(&[b]).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_add_files_size_mismatch_aborts_whole_batch() {
        let dir = TempDir::new().unwrap();
        let a = write_tile(dir.path(), "a.png", 4, 4);
        let b = write_tile(dir.path(), "b.png", 4, 4);
        let big = write_tile(dir.path(), "big.png", 8, 8);

        let mut palette = TilePalette::new();
        palette.add_files(&[a]).unwrap();

        // b decodes fine but the batch dies on big; neither lands.
        let err = palette.add_files(&[b, big]).unwrap_err();
        assert!(matches!(err, MapError::Decode(_)));
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn test_invalid_tile_distinguished_from_out_of_range() {
        let palette = TilePalette::from_parts(vec![Tile::invalid("gone.png".into())], None);
        let tile = palette.get(0).unwrap();
        assert!(!tile.is_valid());
        assert!(palette.get(1).is_none());
    }
}

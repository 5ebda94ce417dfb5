//! SQLite file `*.mbtiles` as tile store.
//!
//! - [`MBTilesReader`] reads tiles, metadata and the per-zoom bounds of an existing file.
//! - [`MBTilesWriter`] creates a file from scratch.
//!
//! Rows in the `tiles` table use the TMS scheme (row 0 at the bottom). Both types take and return
//! top-down rows and flip them internally.

mod metadata;
mod reader;
mod writer;

pub use metadata::Metadata;
pub use reader::MBTilesReader;
pub use writer::MBTilesWriter;

use crate::OpenMode;
use anyhow::Result;
use std::path::Path;

/// Opens an MBTiles file with a file-like mode. Only `"rb"` is supported.
pub fn open(path: &Path, mode: &str) -> Result<MBTilesReader> {
	mode.parse::<OpenMode>()?.ensure_one_of(&[OpenMode::Read], "mbtiles")?;
	MBTilesReader::open_path(path)
}

/// Converts between top-down and TMS rows at zoom level `z`. Returns `None` if `y` lies outside.
pub(crate) fn flip_y(z: u8, y: u32) -> Option<u32> {
	if z > 31 {
		return None;
	}
	let max = (1u64 << z) - 1;
	if u64::from(y) > max {
		return None;
	}
	Some((max - u64::from(y)) as u32)
}

#[cfg(test)]
mod tests {
	use super::*;
	use metatiles_core::TileError;

	#[test]
	fn open_supports_read_only() {
		let err = open(Path::new("does-not-matter.mbtiles"), "wb").unwrap_err();
		assert!(TileError::is_unsupported_mode(&err));

		let err = open(Path::new("does-not-matter.mbtiles"), "a").unwrap_err();
		assert!(TileError::is_unsupported_mode(&err));
	}

	#[test]
	fn flip() {
		assert_eq!(flip_y(0, 0), Some(0));
		assert_eq!(flip_y(1, 0), Some(1));
		assert_eq!(flip_y(12, 1352), Some(2743));
		assert_eq!(flip_y(12, 2743), Some(1352));
		assert_eq!(flip_y(12, 4096), None);
		assert_eq!(flip_y(40, 0), None);
	}
}

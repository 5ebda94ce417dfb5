use super::{MetatileStore, TileStore};
use crate::{MBTilesReader, MetatileReader};
use anyhow::{Result, bail};
use metatiles_core::TileError;
use metatiles_derive::context;
use std::{fs, path::Path};

/// Opens the tile store at `path`.
///
/// - `*.mbtiles`: an [`MBTilesReader`],
/// - `*.meta`: a [`MetatileReader`] for a single metatile,
/// - a directory: a [`MetatileStore`] for `style`.
///
/// # Errors
/// Returns the [`std::io::Error`] if `path` does not exist, and [`TileError::UnsupportedMode`] for
/// any other kind of file.
#[context("opening tile store '{}'", path.display())]
pub fn get_store(path: &Path, style: &str) -> Result<Box<dyn TileStore>> {
	let is_dir = fs::metadata(path)?.is_dir();
	let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

	Ok(match (is_dir, extension) {
		(true, _) => MetatileStore::open_path(path, style)?.boxed(),
		(false, "mbtiles") => MBTilesReader::open_path(path)?.boxed(),
		(false, "meta") => MetatileReader::open_path(path)?.boxed(),
		_ => bail!(TileError::UnsupportedMode(format!(
			"no tile store for '{}', expected a directory, *.mbtiles or *.meta",
			path.display()
		))),
	})
}

//! Read tiles, metadata and bounds from an MBTiles (SQLite) database.
//!
//! ```rust,no_run
//! use metatiles_container::MBTilesReader;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let reader = MBTilesReader::open_path(Path::new("/data/baikal.mbtiles"))?;
//!     println!("{}", reader.metadata());
//!     println!("{}", reader.bounds());
//!
//!     if reader.contains(12, 3281, 1352) {
//!         let blob = reader.read_tile(12, 3281, 1352)?;
//!         println!("{} bytes", blob.len());
//!     }
//!     Ok(())
//! }
//! ```

use super::{Metadata, flip_y};
use anyhow::{Result, bail};
use metatiles_core::{Blob, TileBound, TileBounds, TileError};
use metatiles_derive::context;
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::OptionalExtension};
use std::{fmt, fs, path::Path};

/// Reader for MBTiles (SQLite) files.
///
/// Metadata and bounds are loaded once when the file is opened.
pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
	metadata: Metadata,
	bounds: TileBounds,
}

impl MBTilesReader {
	/// Opens an existing MBTiles file.
	///
	/// # Errors
	/// Returns the [`std::io::Error`] if the file does not exist, or [`TileError::InvalidFormat`]
	/// if the metadata is incomplete.
	#[context("opening MBTiles at '{}'", path.display())]
	pub fn open_path(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");

		// SQLite would silently create a missing file
		fs::metadata(path)?;

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(4).build(manager)?;

		let name = path.to_string_lossy().into_owned();
		let metadata = query_metadata(&pool)?;
		let bounds = query_bounds(&pool, &name, &metadata)?;

		Ok(MBTilesReader {
			name,
			pool,
			metadata,
			bounds,
		})
	}

	/// Reads the `metadata` table.
	#[context("loading metadata from '{}'", self.name)]
	pub fn get_metadata(&self) -> Result<Metadata> {
		query_metadata(&self.pool)
	}

	/// Computes the extent of the `tiles` table for every zoom level between `minzoom` and
	/// `maxzoom`. Zoom levels without tiles are skipped.
	///
	/// The bounds keep the TMS rows of the table and are marked with `flip_y`.
	#[context("computing bounds of '{}'", self.name)]
	pub fn get_bounds(&self) -> Result<TileBounds> {
		query_bounds(&self.pool, &self.name, &self.metadata)
	}

	/// Reads the tile at the top-down coordinate `(z, x, y)`.
	///
	/// # Errors
	/// Returns [`TileError::NotFound`] if the table has no such tile.
	#[context("reading tile {z}/{x}/{y} from '{}'", self.name)]
	pub fn read_tile(&self, z: u8, x: u32, y: u32) -> Result<Blob> {
		log::trace!("read tile {z}/{x}/{y}");

		let Some(row) = flip_y(z, y) else {
			bail!(TileError::NotFound(format!("tile {z}/{x}/{y} lies outside of its zoom level")));
		};

		let conn = self.pool.get()?;
		let mut stmt =
			conn.prepare("SELECT tile_data FROM tiles WHERE zoom_level = ? AND tile_column = ? AND tile_row = ?")?;
		let data = stmt
			.query_row([u32::from(z), x, row], |row| row.get::<_, Vec<u8>>(0))
			.optional()?;

		match data {
			Some(data) => Ok(Blob::from(data)),
			None => bail!(TileError::NotFound(format!("no tile {z}/{x}/{y} in '{}'", self.name))),
		}
	}

	/// Checks the top-down coordinate against the bounds of its zoom level.
	pub fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		self.bounds.contains(z, x, y)
	}

	pub fn metadata(&self) -> &Metadata {
		&self.metadata
	}

	pub fn bounds(&self) -> &TileBounds {
		&self.bounds
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

fn query_metadata(pool: &Pool<SqliteConnectionManager>) -> Result<Metadata> {
	log::debug!("get_metadata");

	let conn = pool.get()?;
	let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
	let entries = stmt
		.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
		.collect::<Result<Vec<_>, _>>()?;

	Metadata::from_entries(entries)
}

fn query_bounds(pool: &Pool<SqliteConnectionManager>, name: &str, metadata: &Metadata) -> Result<TileBounds> {
	log::debug!("get_bounds");

	let conn = pool.get()?;
	let mut stmt = conn.prepare(
		"SELECT MIN(tile_column), MAX(tile_column), MIN(tile_row), MAX(tile_row) FROM tiles WHERE zoom_level = ?",
	)?;

	let mut bounds = Vec::new();
	for z in metadata.minzoom..=metadata.maxzoom {
		let extent = stmt.query_row([z], |row| {
			Ok((
				row.get::<_, Option<u32>>(0)?,
				row.get::<_, Option<u32>>(1)?,
				row.get::<_, Option<u32>>(2)?,
				row.get::<_, Option<u32>>(3)?,
			))
		})?;

		let (Some(min_x), Some(max_x), Some(min_y), Some(max_y)) = extent else {
			log::warn!("'{name}' contains no tiles at zoom level {z}");
			continue;
		};
		log::trace!("zoom level {z}: x {min_x}-{max_x}, y {min_y}-{max_y}");

		bounds.push(TileBound::new(z, min_x, max_x, min_y, max_y, true)?);
	}

	TileBounds::new(bounds)
}

impl fmt::Display for MBTilesReader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.metadata)
	}
}

impl fmt::Debug for MBTilesReader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MBTilesReader")
			.field("name", &self.name)
			.field("metadata", &self.metadata)
			.field("bounds", &self.bounds)
			.finish()
	}
}

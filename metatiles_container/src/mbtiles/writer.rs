//! Create MBTiles (SQLite) files.
//!
//! The schema holds a `metadata` table of `(name, value)` pairs and a `tiles` table keyed by
//! `(zoom_level, tile_column, tile_row)`. Rows are stored in the TMS scheme.

use super::{Metadata, flip_y};
use anyhow::{Result, bail};
use metatiles_core::{Blob, Point, TileError};
use metatiles_derive::context;
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::params};
use std::{collections::BTreeMap, fs::remove_file, path::Path};

/// Writer for MBTiles (SQLite) files.
pub struct MBTilesWriter {
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesWriter {
	/// Creates a new, empty MBTiles file at `path`, replacing an existing one.
	#[context("creating MBTiles at '{}'", path.display())]
	pub fn create(path: &Path) -> Result<MBTilesWriter> {
		log::debug!("create {path:?}");

		if path.exists() {
			remove_file(path)?;
		}
		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(1).build(manager)?;

		pool.get()?.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));",
		)?;

		Ok(MBTilesWriter { pool })
	}

	/// Inserts or replaces a metadata entry.
	#[context("setting metadata '{}' = '{}'", name, value)]
	pub fn set_metadata(&self, name: &str, value: &str) -> Result<()> {
		self.pool.get()?.execute(
			"INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
			params![name, value],
		)?;
		Ok(())
	}

	pub fn set_metadata_entries(&self, entries: &[(&str, &str)]) -> Result<()> {
		for (name, value) in entries {
			self.set_metadata(name, value)?;
		}
		Ok(())
	}

	/// Writes all entries of `metadata`.
	pub fn write_metadata(&self, metadata: &Metadata) -> Result<()> {
		for (name, value) in metadata.entries() {
			self.set_metadata(&name, &value)?;
		}
		Ok(())
	}

	/// Adds the tiles of zoom level `z` in a single transaction. `tiles` is keyed by top-down
	/// coordinates.
	#[context("adding {} tiles at zoom level {z}", tiles.len())]
	pub fn add_tiles(&mut self, z: u8, tiles: &BTreeMap<Point, Blob>) -> Result<()> {
		let mut conn = self.pool.get()?;
		let transaction = conn.transaction()?;
		for (point, blob) in tiles {
			let Some(row) = flip_y(z, point.y) else {
				bail!(TileError::InvalidFormat(format!(
					"tile {point:?} lies outside of zoom level {z}"
				)));
			};
			transaction.execute(
				"INSERT OR REPLACE INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
				params![z, point.x, row, blob.as_slice()],
			)?;
		}
		transaction.commit()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MBTilesReader;
	use assert_fs::NamedTempFile;
	use pretty_assertions::assert_eq;

	#[test]
	fn write_then_read() -> Result<()> {
		let file = NamedTempFile::new("out.mbtiles")?;
		let metadata = Metadata::from_entries(
			[
				("center", "0,0,1"),
				("format", "png"),
				("bounds", "-180,-85,180,85"),
				("minzoom", "1"),
				("maxzoom", "1"),
				("attribution", "me"),
			]
			.map(|(k, v)| (k.to_owned(), v.to_owned())),
		)?;

		let mut writer = MBTilesWriter::create(file.path())?;
		writer.write_metadata(&metadata)?;
		writer.add_tiles(1, &BTreeMap::from([(Point::new(0, 1), Blob::from("bottom left"))]))?;
		drop(writer);

		let reader = MBTilesReader::open_path(file.path())?;
		assert_eq!(reader.metadata(), &metadata);
		assert_eq!(reader.read_tile(1, 0, 1)?.as_slice(), b"bottom left");
		assert_eq!(reader.bounds().to_string(), "[Bound(z:1 x:0-0 y:0-0)]");
		Ok(())
	}

	#[test]
	fn create_replaces_existing_file() -> Result<()> {
		let file = NamedTempFile::new("out.mbtiles")?;
		let mut writer = MBTilesWriter::create(file.path())?;
		writer.add_tiles(0, &BTreeMap::from([(Point::new(0, 0), Blob::from("old"))]))?;
		drop(writer);

		let writer = MBTilesWriter::create(file.path())?;
		let count: u32 = writer
			.pool
			.get()?
			.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		assert_eq!(count, 0);
		Ok(())
	}

	#[test]
	fn rejects_rows_outside_of_zoom_level() -> Result<()> {
		let file = NamedTempFile::new("out.mbtiles")?;
		let mut writer = MBTilesWriter::create(file.path())?;
		let err = writer
			.add_tiles(2, &BTreeMap::from([(Point::new(0, 4), Blob::from("x"))]))
			.unwrap_err();
		assert!(TileError::is_invalid_format(&err), "{err}");
		Ok(())
	}
}

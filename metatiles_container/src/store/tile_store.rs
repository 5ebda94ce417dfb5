use crate::{MBTilesReader, MetatileReader};
use anyhow::{Result, bail};
use metatiles_core::{Blob, TileError};
use std::{
	fmt::Debug,
	io::{Read, Seek},
};

/// Random access to tiles by their top-down coordinate.
///
/// Implemented by [`MBTilesReader`], by [`MetatileReader`] for a single metatile, and by
/// [`crate::MetatileStore`] for a directory of metatiles.
pub trait TileStore: Debug {
	/// Name of the store, usually its path.
	fn name(&self) -> &str;

	/// Reads the tile at `(z, x, y)`.
	///
	/// # Errors
	/// Returns [`TileError::NotFound`] if the store has no such tile.
	fn read_tile(&mut self, z: u8, x: u32, y: u32) -> Result<Blob>;

	/// Checks whether the store covers `(z, x, y)`.
	fn contains(&self, z: u8, x: u32, y: u32) -> bool;

	fn boxed(self) -> Box<dyn TileStore>
	where
		Self: Sized + 'static,
	{
		Box::new(self)
	}
}

impl TileStore for MBTilesReader {
	fn name(&self) -> &str {
		MBTilesReader::name(self)
	}

	fn read_tile(&mut self, z: u8, x: u32, y: u32) -> Result<Blob> {
		MBTilesReader::read_tile(self, z, x, y)
	}

	/// Checks the coordinate against the bounds of the file. A tile inside the bounds may still be
	/// missing.
	fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		MBTilesReader::contains(self, z, x, y)
	}
}

impl<R: Read + Seek> TileStore for MetatileReader<R> {
	fn name(&self) -> &str {
		MetatileReader::name(self)
	}

	fn read_tile(&mut self, z: u8, x: u32, y: u32) -> Result<Blob> {
		let Some(offset) = self.metatile().offset_of(z, x, y) else {
			bail!(TileError::NotFound(format!(
				"tile {z}/{x}/{y} is not part of {}",
				self.metatile()
			)));
		};
		MetatileReader::read_tile(self, offset.x, offset.y)
	}

	/// Checks whether the slot of the coordinate is populated.
	fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		self
			.metatile()
			.offset_of(z, x, y)
			.is_some_and(|offset| self.index().contains(offset.x, offset.y))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MetatileWriter;
	use metatiles_core::Point;
	use pretty_assertions::assert_eq;
	use std::{collections::BTreeMap, io::Cursor};

	fn store() -> Box<dyn TileStore> {
		let tiles = BTreeMap::from([
			(Point::new(696, 320), Blob::from("a")),
			(Point::new(697, 321), Blob::from("b")),
		]);
		let data = MetatileWriter::encode(696, 320, 10, &tiles).unwrap().into_vec();
		MetatileReader::from_reader(Cursor::new(data), "osm", "memory")
			.unwrap()
			.boxed()
	}

	#[test]
	fn metatile_reader_as_store() -> Result<()> {
		let mut store = store();
		assert_eq!(store.name(), "memory");
		assert_eq!(store.read_tile(10, 697, 321)?.as_slice(), b"b");
		assert!(store.contains(10, 696, 320));
		assert!(!store.contains(10, 696, 321));
		assert!(!store.contains(10, 704, 320));
		assert!(!store.contains(11, 696, 320));
		Ok(())
	}

	#[test]
	fn metatile_reader_outside_is_not_found() {
		let mut store = store();
		for (z, x, y) in [(10, 696, 321), (10, 704, 320), (10, 695, 320), (9, 348, 160)] {
			let err = store.read_tile(z, x, y).unwrap_err();
			assert!(TileError::is_not_found(&err), "{z}/{x}/{y}: {err}");
		}
	}
}

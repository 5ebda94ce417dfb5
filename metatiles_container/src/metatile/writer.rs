//! Writing `.meta` files.
//!
//! The writer always emits a full index of `size²` slots in slot order, with the payloads
//! concatenated in the same order. Empty slots point at the current end of the payload and have a
//! size of `0`. Reading a file and writing its tiles back reproduces it byte by byte.
//!
//! From zoom level 3 on this is the 64-slot layout of mod_tile. Below that the metatile is smaller
//! than 8×8 and only `size²` slots keyed `dx * size + dy` are written, which mod_tile does not read.

use super::{Header, index::point_to_slot};
use anyhow::{Result, bail};
use byteorder::{LittleEndian, WriteBytesExt};
use metatiles_core::{Blob, Point, TileError, metatile_size};
use metatiles_derive::context;
use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

/// Writes one metatile file.
#[derive(Clone, Debug)]
pub struct MetatileWriter {
	path: PathBuf,
}

impl MetatileWriter {
	/// Prepares a writer for `path`. Nothing is touched on disk until [`Self::write`].
	pub fn create(path: &Path) -> MetatileWriter {
		MetatileWriter {
			path: path.to_path_buf(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Serializes the tiles of the metatile with origin `(x, y)` at zoom level `z`.
	///
	/// `tiles` is keyed by absolute tile coordinates.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if the origin is not a valid metatile origin, if a tile
	/// lies outside of the metatile, or if the payload does not fit into 32-bit offsets.
	pub fn encode(x: u32, y: u32, z: u8, tiles: &BTreeMap<Point, Blob>) -> Result<Blob> {
		let size = metatile_size(z);
		let header = Header::new(size * size, x, y, z)?;

		let mut slots: Vec<Option<&Blob>> = vec![None; header.count as usize];
		for (point, blob) in tiles {
			if point.x < x || point.y < y || point.x - x >= size || point.y - y >= size {
				bail!(TileError::InvalidFormat(format!(
					"tile {point:?} lies outside of the metatile at {x}/{y} (zoom level {z})"
				)));
			}
			let slot = point_to_slot(size, Point::new(point.x - x, point.y - y));
			slots[slot as usize] = Some(blob);
		}

		let payload_size: u64 = slots.iter().flatten().map(|blob| blob.len()).sum();
		let total_size = header.payload_start() + payload_size;
		if total_size > i32::MAX as u64 {
			bail!(TileError::InvalidFormat(format!(
				"metatile at {x}/{y} (zoom level {z}) would be {total_size} bytes, which exceeds 32-bit offsets"
			)));
		}

		let mut data: Vec<u8> = Vec::with_capacity(total_size as usize);
		header.write(&mut data)?;

		let mut offset = header.payload_start();
		for blob in &slots {
			let size = blob.map_or(0, |blob| blob.len());
			data.write_i32::<LittleEndian>(offset as i32)?;
			data.write_i32::<LittleEndian>(size as i32)?;
			offset += size;
		}
		debug_assert_eq!(data.len() as u64, header.payload_start());

		for blob in slots.into_iter().flatten() {
			data.extend_from_slice(blob.as_slice());
		}

		Ok(Blob::from(data))
	}

	/// Encodes the tiles and writes them to the path of this writer, creating parent directories.
	///
	/// The file is written next to its destination and then renamed into place.
	pub fn write(&self, x: u32, y: u32, z: u8, tiles: &BTreeMap<Point, Blob>) -> Result<()> {
		let blob = MetatileWriter::encode(x, y, z, tiles)?;
		self.write_encoded(&blob)?;
		log::trace!("wrote {} tiles to {:?}", tiles.len(), self.path);
		Ok(())
	}

	/// Writes a metatile produced by [`Self::encode`] to the path of this writer.
	#[context("writing metatile '{}'", self.path.display())]
	pub fn write_encoded(&self, blob: &Blob) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}

		let tmp_path = self.path.with_extension("meta.tmp");
		fs::write(&tmp_path, blob.as_slice())?;
		fs::rename(&tmp_path, &self.path)?;

		log::trace!("wrote {} bytes to {:?}", blob.len(), self.path);
		Ok(())
	}
}

//! The index table following the header.
//!
//! The table holds `count` entries of `(offset: i32, size: i32)`, little-endian. Entry `i` belongs
//! to the tile at `(dx, dy) = (i / size, i % size)` relative to the metatile origin, where `size` is
//! the metatile size of the zoom level. On disk, offsets count from the start of the file. An entry
//! with `size == 0` marks an empty slot.

use super::{Header, invalid_on_eof};
use anyhow::{Result, bail};
use byteorder::{LittleEndian, ReadBytesExt};
use metatiles_core::{Point, TileError};
use std::{collections::BTreeMap, io::Read};

/// Location of one tile payload. `offset` is relative to the start of the payload region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
	pub offset: u64,
	pub size: u64,
}

impl IndexEntry {
	pub fn new(offset: u64, size: u64) -> IndexEntry {
		IndexEntry { offset, size }
	}
}

/// The populated slots of a metatile, keyed by their position relative to the origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetatileIndex {
	entries: BTreeMap<Point, IndexEntry>,
}

impl MetatileIndex {
	/// Reads exactly `header.count` entries.
	///
	/// `stream_len` is the total length of the file, used to reject entries pointing past its end.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if the table is truncated, contains negative numbers, or
	/// points outside of the payload region.
	pub fn read<R: Read>(reader: &mut R, header: &Header, stream_len: u64) -> Result<MetatileIndex> {
		let payload_start = header.payload_start();
		let mut entries = BTreeMap::new();

		for slot in 0..header.count {
			let offset = reader.read_i32::<LittleEndian>().map_err(invalid_on_eof("index"))?;
			let size = reader.read_i32::<LittleEndian>().map_err(invalid_on_eof("index"))?;

			let (Ok(offset), Ok(size)) = (u64::try_from(offset), u64::try_from(size)) else {
				bail!(TileError::InvalidFormat(format!(
					"index slot {slot} has a negative offset or size ({offset}, {size})"
				)));
			};
			if size == 0 {
				continue;
			}
			if offset < payload_start || offset + size > stream_len {
				bail!(TileError::InvalidFormat(format!(
					"index slot {slot} points to bytes {offset}..{} outside of the payload region {payload_start}..{stream_len}",
					offset + size
				)));
			}

			entries.insert(
				slot_to_point(header.size(), slot),
				IndexEntry::new(offset - payload_start, size),
			);
		}

		Ok(MetatileIndex { entries })
	}

	pub fn from_entries(entries: BTreeMap<Point, IndexEntry>) -> MetatileIndex {
		MetatileIndex { entries }
	}

	/// Entry of the tile at `(dx, dy)` relative to the origin.
	pub fn get(&self, dx: u32, dy: u32) -> Option<&IndexEntry> {
		self.entries.get(&Point::new(dx, dy))
	}

	pub fn contains(&self, dx: u32, dy: u32) -> bool {
		self.entries.contains_key(&Point::new(dx, dy))
	}

	/// Populated slots in slot order.
	pub fn iter(&self) -> impl Iterator<Item = (&Point, &IndexEntry)> {
		self.entries.iter()
	}

	/// Number of populated slots.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total number of payload bytes referenced by the index.
	pub fn payload_size(&self) -> u64 {
		self.entries.values().map(|entry| entry.size).sum()
	}
}

/// Position of index slot `slot` in a metatile with `size` tiles per edge.
pub(crate) fn slot_to_point(size: u32, slot: u32) -> Point {
	Point::new(slot / size, slot % size)
}

/// Index slot of the tile at `(dx, dy)` in a metatile with `size` tiles per edge.
pub(crate) fn point_to_slot(size: u32, point: Point) -> u32 {
	point.x * size + point.y
}

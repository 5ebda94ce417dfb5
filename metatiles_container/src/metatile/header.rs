//! The fixed-size header at the start of every `.meta` file.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "META"
//! 4       4     count: number of index slots
//! 8       4     x: column of the metatile origin
//! 12      4     y: row of the metatile origin
//! 16      4     z: zoom level
//! ```
//!
//! All numbers are little-endian `i32`, as written by mod_tile.

use super::address::check_origin;
use super::{Metatile, invalid_on_eof};
use anyhow::{Result, bail};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use metatiles_core::{MAX_ZOOM_LEVEL, MetatileHash, TileError, metatile_size};
use std::{
	fmt,
	io::{Read, Write},
};

pub const MAGIC: &[u8; 4] = b"META";
pub const HEADER_SIZE: u64 = 20;
pub const ENTRY_SIZE: u64 = 8;

/// Header of a metatile file.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Header {
	/// Number of index slots following the header.
	pub count: u32,
	pub x: u32,
	pub y: u32,
	pub z: u8,
}

impl Header {
	/// Creates a validated header.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if the zoom level is too deep, if `count` exceeds the
	/// number of tiles in a metatile at this zoom level, or if `(x, y)` is not a metatile origin.
	pub fn new(count: u32, x: u32, y: u32, z: u8) -> Result<Header> {
		if z > MAX_ZOOM_LEVEL {
			bail!(TileError::InvalidFormat(format!(
				"zoom level {z} exceeds the maximum metatile zoom level {MAX_ZOOM_LEVEL}"
			)));
		}
		let slots = metatile_size(z) * metatile_size(z);
		if count > slots {
			bail!(TileError::InvalidFormat(format!(
				"index count {count} exceeds the {slots} tiles of a metatile at zoom level {z}"
			)));
		}
		check_origin(z, (x, y).into())?;
		Ok(Header { count, x, y, z })
	}

	/// Reads and validates a header.
	pub fn read<R: Read>(reader: &mut R) -> Result<Header> {
		let mut magic = [0u8; 4];
		reader.read_exact(&mut magic).map_err(invalid_on_eof("header"))?;
		if &magic != MAGIC {
			bail!(TileError::InvalidFormat(format!(
				"expected magic {MAGIC:?} but found {magic:?}"
			)));
		}

		let mut fields = [0u32; 4];
		for (field, name) in fields.iter_mut().zip(["count", "x", "y", "z"]) {
			let value = reader.read_i32::<LittleEndian>().map_err(invalid_on_eof("header"))?;
			*field = u32::try_from(value)
				.map_err(|_| TileError::InvalidFormat(format!("header field {name} is negative ({value})")))?;
		}
		let [count, x, y, z] = fields;
		let z = u8::try_from(z).map_err(|_| TileError::InvalidFormat(format!("zoom level {z} is too large")))?;

		Header::new(count, x, y, z)
	}

	pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
		writer.write_all(MAGIC)?;
		for value in [self.count, self.x, self.y, u32::from(self.z)] {
			writer.write_i32::<LittleEndian>(value as i32)?;
		}
		Ok(())
	}

	/// Number of tiles along one edge of the metatile.
	pub fn size(&self) -> u32 {
		metatile_size(self.z)
	}

	/// Byte length of the index table.
	pub fn index_size(&self) -> u64 {
		u64::from(self.count) * ENTRY_SIZE
	}

	/// Absolute byte position of the payload region.
	pub fn payload_start(&self) -> u64 {
		HEADER_SIZE + self.index_size()
	}

	/// Returns the metatile described by this header.
	pub fn metatile(&self, style: &str) -> Result<Metatile> {
		Metatile::new(self.z, MetatileHash::from_xy(self.x, self.y), style)
	}
}

impl fmt::Display for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Header(count={}, x={}, y={}, z={})", self.count, self.x, self.y, self.z)
	}
}

impl fmt::Debug for Header {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{self}")
	}
}

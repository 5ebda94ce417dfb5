//! The mod_tile hash codec.
//!
//! A metatile origin `(x, y)` is stored as five bytes. Each byte holds one nibble of `x` (high) and
//! the matching nibble of `y` (low), most significant nibble first:
//!
//! ```text
//! x = 0x2b8 (696), y = 0x140 (320)
//! nibbles of x: 0 0 2 b 8
//! nibbles of y: 0 0 1 4 0
//! hash:         [0x00, 0x00, 0x21, 0xb4, 0x80] = [0, 0, 33, 180, 128]
//! ```
//!
//! Sibling metatiles share their leading bytes, which keeps them close together in the directory
//! tree built from the hash (see `Metatile::path`).

use crate::{HASH_LENGTH, METATILE_SIZE, Point};
use std::fmt;

/// Five-byte nibble-interleaved encoding of a metatile origin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetatileHash([u8; HASH_LENGTH]);

impl MetatileHash {
	/// Encodes the metatile that contains the tile `(x, y)`.
	///
	/// Both coordinates are aligned down to a multiple of [`METATILE_SIZE`] first. At zoom levels
	/// below 3 every coordinate is smaller than the metatile, so this is the same as aligning to the
	/// zoom dependent metatile size.
	pub fn from_xy(x: u32, y: u32) -> MetatileHash {
		let mut x = x & !(METATILE_SIZE - 1);
		let mut y = y & !(METATILE_SIZE - 1);

		let mut bytes = [0u8; HASH_LENGTH];
		for byte in bytes.iter_mut().rev() {
			*byte = (((x & 0x0f) << 4) | (y & 0x0f)) as u8;
			x >>= 4;
			y >>= 4;
		}
		MetatileHash(bytes)
	}

	pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> MetatileHash {
		MetatileHash(bytes)
	}

	/// Decodes the metatile origin.
	pub fn to_xy(&self) -> Point {
		let (x, y) = self.0.iter().fold((0u32, 0u32), |(x, y), byte| {
			((x << 4) | u32::from(byte >> 4), (y << 4) | u32::from(byte & 0x0f))
		});
		Point::new(x, y)
	}

	pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
		&self.0
	}
}

impl fmt::Display for MetatileHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let [h0, h1, h2, h3, h4] = self.0;
		write!(f, "{h0}/{h1}/{h2}/{h3}/{h4}")
	}
}

impl fmt::Debug for MetatileHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "MetatileHash({self})")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(696, 320, [0, 0, 33, 180, 128])]
	#[case(697, 321, [0, 0, 33, 180, 128])]
	#[case(703, 327, [0, 0, 33, 180, 128])]
	#[case(0, 0, [0, 0, 0, 0, 0])]
	#[case(1, 1, [0, 0, 0, 0, 0])]
	#[case(8, 0, [0, 0, 0, 0, 128])]
	#[case(0, 8, [0, 0, 0, 0, 8])]
	#[case(0xfffff, 0xfffff, [255, 255, 255, 255, 136])]
	fn encode(#[case] x: u32, #[case] y: u32, #[case] bytes: [u8; 5]) {
		assert_eq!(MetatileHash::from_xy(x, y).as_bytes(), &bytes);
	}

	#[test]
	fn decode() {
		assert_eq!(
			MetatileHash::from_bytes([0, 0, 33, 180, 128]).to_xy(),
			Point::new(696, 320)
		);
		assert_eq!(
			MetatileHash::from_bytes([255, 255, 255, 255, 136]).to_xy(),
			Point::new(0xffff8, 0xffff8)
		);
	}

	#[test]
	fn decode_inverts_encode() {
		// every aligned origin on a sparse grid reaching up to 2^20
		for x in (0..(1u32 << 20)).step_by(8 * 1021) {
			for y in (0..(1u32 << 20)).step_by(8 * 997) {
				assert_eq!(MetatileHash::from_xy(x, y).to_xy(), Point::new(x, y));
			}
		}
		let last = (1u32 << 20) - 8;
		assert_eq!(MetatileHash::from_xy(last, last).to_xy(), Point::new(last, last));
	}

	#[test]
	fn display() {
		let hash = MetatileHash::from_xy(696, 320);
		assert_eq!(hash.to_string(), "0/0/33/180/128");
		assert_eq!(format!("{hash:?}"), "MetatileHash(0/0/33/180/128)");
	}
}

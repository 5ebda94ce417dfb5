//! Constants of the mod_tile metatile layout.

/// Number of tiles along one edge of a full metatile.
pub const METATILE_SIZE: u32 = 8;

/// File extension of a metatile container, including the dot.
pub const METATILE_EXTENSION: &str = ".meta";

/// Number of bytes in a metatile hash.
pub const HASH_LENGTH: usize = 5;

/// Highest zoom level that can be addressed.
///
/// Five hash bytes carry 20 bits per axis, so coordinates must stay below `2^20`.
pub const MAX_ZOOM_LEVEL: u8 = 20;

/// Number of tiles along one edge of a metatile at zoom level `z`: `min(8, 2^z)`.
///
/// At low zoom levels there are fewer tiles in the whole world than in a full metatile.
pub const fn metatile_size(z: u8) -> u32 {
	if z >= 3 { METATILE_SIZE } else { 1 << z }
}

/// Number of tiles along one edge of the world at zoom level `z`.
pub const fn world_size(z: u8) -> u64 {
	1u64 << z
}

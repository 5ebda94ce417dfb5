//! Contains the value types shared by the metatiles crates: points, tiles, bounds, payload blobs,
//! the metatile hash codec and the typed errors.

pub mod types;
pub use types::*;

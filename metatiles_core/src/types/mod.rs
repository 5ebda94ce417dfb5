//! Contains types like points, tiles, bounds, hashes and more.

mod blob;
pub use blob::*;

pub mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod metatile_hash;
pub use metatile_hash::*;

mod point;
pub use point::*;

mod tile;
pub use tile::*;

mod tile_bound;
pub use tile_bound::*;

mod tile_bounds;
pub use tile_bounds::*;

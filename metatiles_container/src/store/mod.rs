//! The read interface shared by all tile stores.
//!
//! - [`TileStore`]: random access to tiles by top-down `(z, x, y)` coordinates,
//! - [`MetatileStore`]: a directory tree of metatiles,
//! - [`get_store`]: opens the right store for a path.

mod getters;
mod metatile_store;
mod tile_store;

pub use getters::get_store;
pub use metatile_store::MetatileStore;
pub use tile_store::TileStore;

//! Metatiles Container: address, read and write map tiles stored as mod_tile metatiles or MBTiles.
//!
//! This crate provides:
//! - [`Metatile`]: the container a tile lives in, derived from the tile's hash,
//! - [`bound_to_metatiles`]: the minimal set of containers covering a tile range,
//! - [`MetatileReader`] / [`MetatileWriter`]: the binary `.meta` container format,
//! - [`MBTilesReader`] / [`MBTilesWriter`]: the SQLite based MBTiles format,
//! - [`TileStore`]: the shared read interface, implemented by both backends and by
//!   [`MetatileStore`], a directory tree of metatiles.
//!
//! # Quick start
//! ```rust,no_run
//! use metatiles_container::*;
//! use metatiles_core::*;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut store = get_store(Path::new("/data/tiles"), "osm")?;
//!     if store.contains(10, 697, 321) {
//!         let blob = store.read_tile(10, 697, 321)?;
//!         println!("{} bytes", blob.len());
//!     }
//!     Ok(())
//! }
//! ```

mod convert;
pub use convert::*;

pub mod mbtiles;
pub use mbtiles::{MBTilesReader, MBTilesWriter, Metadata};

pub mod metatile;
pub use metatile::{
	Header, IndexEntry, Metatile, MetatileFile, MetatileIndex, MetatileIter, MetatileReader, MetatileWriter,
	bound_to_metatiles,
};

mod store;
pub use store::*;

mod open_mode;
pub use open_mode::*;

//! Copying the tiles of an MBTiles file into a directory of metatiles.

use crate::{MBTilesReader, MetatileStore, bound_to_metatiles};
use anyhow::Result;
use metatiles_core::{Blob, MAX_ZOOM_LEVEL, Point, TileError};
use metatiles_derive::context;
use std::{collections::BTreeMap, fmt, ops::RangeInclusive};

/// What a conversion wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
	pub metatiles: u64,
	pub tiles: u64,
}

impl fmt::Display for ConvertStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} tiles in {} metatiles", self.tiles, self.metatiles)
	}
}

/// Writes every tile of `reader` whose zoom level lies in `zoom_range` to `store`.
///
/// Each zoom level is walked metatile by metatile over the bounds of the file. Tiles missing from
/// the file are skipped, and metatiles without any tile are not written.
#[context("converting '{}' to metatiles", reader.name())]
pub fn convert_mbtiles_to_metatiles(
	reader: &MBTilesReader,
	store: &MetatileStore,
	zoom_range: RangeInclusive<u8>,
) -> Result<ConvertStats> {
	let mut stats = ConvertStats::default();

	for bound in reader.bounds().iter() {
		let z = bound.z();
		if !zoom_range.contains(&z) {
			continue;
		}
		if z > MAX_ZOOM_LEVEL {
			log::warn!("skipping zoom level {z}, metatiles go down to zoom level {MAX_ZOOM_LEVEL}");
			continue;
		}

		let top_down = bound.to_top_down();
		let mut level = ConvertStats::default();

		for metatile in bound_to_metatiles(&top_down, store.style()) {
			let metatile = metatile?;

			let mut tiles: BTreeMap<Point, Blob> = BTreeMap::new();
			for point in metatile.points().filter(|p| top_down.contains(z, p.x, p.y)) {
				match reader.read_tile(z, point.x, point.y) {
					Ok(blob) => {
						tiles.insert(point, blob);
					}
					Err(err) if TileError::is_not_found(&err) => log::trace!("no tile at {z}/{}/{}", point.x, point.y),
					Err(err) => return Err(err),
				}
			}

			if tiles.is_empty() {
				continue;
			}
			store.write_tiles(z, &tiles)?;
			level.metatiles += 1;
			level.tiles += tiles.len() as u64;
		}

		log::info!("zoom level {z}: wrote {level}");
		stats.metatiles += level.metatiles;
		stats.tiles += level.tiles;
	}

	log::info!("converted {stats}");
	Ok(stats)
}

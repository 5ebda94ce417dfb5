//! Splitting a tile range into the metatiles that cover it.
//!
//! [`bound_to_metatiles`] walks the tiles of a bound column by column and resolves each tile to its
//! metatile. A metatile is emitted the first time it shows up.
//!
//! Duplicates are filtered with a small ring of the most recently emitted metatiles instead of a
//! set of everything seen so far. This only works because of the traversal order: every column of
//! the bound visits the same metatile rows in the same order, so a metatile can only recur while
//! it is among the last `rows` emitted ones, where `rows` is the number of metatile rows the bound
//! spans. Feeding the ring in any other order would emit duplicates.

use super::Metatile;
use anyhow::Result;
use metatiles_core::{BoundPoints, METATILE_SIZE, TileBound, metatile_size};
use std::collections::VecDeque;

/// Returns the metatiles of `style` that intersect `bound`, each exactly once.
///
/// The iterator is lazy and single-pass; call the function again to restart.
///
/// ```rust
/// use metatiles_container::bound_to_metatiles;
/// use metatiles_core::TileBound;
///
/// let bound = TileBound::new(10, 692, 703, 318, 324, false).unwrap();
/// let names: Vec<String> = bound_to_metatiles(&bound, "mapname")
///     .map(|metatile| metatile.unwrap().to_string())
///     .collect();
/// assert_eq!(names, [
///     "Metatile(z:10, x:688-695, y:312-319, style:mapname)",
///     "Metatile(z:10, x:688-695, y:320-327, style:mapname)",
///     "Metatile(z:10, x:696-703, y:312-319, style:mapname)",
///     "Metatile(z:10, x:696-703, y:320-327, style:mapname)",
/// ]);
/// ```
pub fn bound_to_metatiles(bound: &TileBound, style: &str) -> MetatileIter {
	let top_down = bound.to_top_down();
	let size = metatile_size(top_down.z());
	let first_row = top_down.min_y() / size;
	let last_row = top_down.max_y() / size;
	let capacity = ((last_row - first_row + 1).max(size)) as usize;

	log::trace!("bound_to_metatiles {top_down} with a window of {capacity} metatiles");

	MetatileIter {
		z: top_down.z(),
		style: style.to_owned(),
		points: top_down.points(),
		recent: RecentMetatiles::new(capacity),
		failed: false,
	}
}

/// Iterator returned by [`bound_to_metatiles`].
pub struct MetatileIter {
	z: u8,
	style: String,
	points: BoundPoints,
	recent: RecentMetatiles,
	failed: bool,
}

impl Iterator for MetatileIter {
	type Item = Result<Metatile>;

	/// After the first error the iterator is exhausted.
	fn next(&mut self) -> Option<Result<Metatile>> {
		if self.failed {
			return None;
		}
		for point in self.points.by_ref() {
			let metatile = match Metatile::from_coord(&self.style, self.z, point.x, point.y) {
				Ok(metatile) => metatile,
				Err(err) => {
					self.failed = true;
					return Some(Err(err));
				}
			};
			if !self.recent.contains(&metatile) {
				self.recent.push(metatile.clone());
				return Some(Ok(metatile));
			}
		}
		None
	}
}

/// The last `capacity` emitted metatiles, oldest first.
struct RecentMetatiles {
	items: VecDeque<Metatile>,
	capacity: usize,
}

impl RecentMetatiles {
	fn new(capacity: usize) -> RecentMetatiles {
		let capacity = capacity.max(METATILE_SIZE as usize);
		RecentMetatiles {
			items: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	fn contains(&self, metatile: &Metatile) -> bool {
		// newest first: a repeat is most likely one of the latest entries
		self.items.iter().rev().any(|item| item == metatile)
	}

	fn push(&mut self, metatile: Metatile) {
		if self.items.len() == self.capacity {
			self.items.pop_front();
		}
		self.items.push_back(metatile);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use metatiles_core::{Point, Tile};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use std::collections::HashSet;

	fn collect(bound: &TileBound) -> Vec<Metatile> {
		bound_to_metatiles(bound, "mapname").collect::<Result<Vec<_>>>().unwrap()
	}

	fn origins(metatiles: &[Metatile]) -> Vec<(u32, u32)> {
		metatiles.iter().map(|m| (m.x(), m.y())).collect()
	}

	#[test]
	fn two_by_two() {
		let bound = TileBound::new(10, 692, 703, 318, 324, false).unwrap();
		let metatiles = collect(&bound);
		assert_eq!(origins(&metatiles), vec![(688, 312), (688, 320), (696, 312), (696, 320)]);
		assert!(metatiles.iter().all(|m| m.style() == "mapname" && m.z() == 10));
	}

	#[test]
	fn single_tile() {
		let bound = TileBound::new(10, 697, 697, 321, 321, false).unwrap();
		assert_eq!(origins(&collect(&bound)), vec![(696, 320)]);
	}

	#[test]
	fn low_zoom_levels() {
		assert_eq!(origins(&collect(&TileBound::new_full(0).unwrap())), vec![(0, 0)]);
		assert_eq!(origins(&collect(&TileBound::new_full(2).unwrap())), vec![(0, 0)]);
		assert_eq!(
			origins(&collect(&TileBound::new_full(4).unwrap())),
			vec![(0, 0), (0, 8), (8, 0), (8, 8)]
		);
	}

	#[test]
	fn flipped_bound() {
		// bottom-up rows 0..=1 at zoom 4 are top-down rows 14..=15
		let bound = TileBound::new(4, 0, 9, 0, 1, true).unwrap();
		assert_eq!(origins(&collect(&bound)), vec![(0, 8), (8, 8)]);
	}

	#[rstest]
	#[case(10, 0, 0, 0, 200)]
	#[case(10, 3, 40, 5, 90)]
	#[case(12, 100, 101, 7, 300)]
	#[case(8, 0, 255, 0, 255)]
	#[case(6, 5, 5, 0, 63)]
	#[case(6, 0, 63, 9, 9)]
	fn covers_every_tile_exactly_once(
		#[case] z: u8,
		#[case] min_x: u32,
		#[case] max_x: u32,
		#[case] min_y: u32,
		#[case] max_y: u32,
	) {
		let bound = TileBound::new(z, min_x, max_x, min_y, max_y, false).unwrap();
		let metatiles = collect(&bound);

		let unique: HashSet<&Metatile> = metatiles.iter().collect();
		assert_eq!(unique.len(), metatiles.len(), "duplicates in {metatiles:?}");

		let covered: HashSet<Point> = metatiles.iter().flat_map(|m| m.points()).collect();
		for point in bound.points() {
			assert!(covered.contains(&point), "{point:?} is not covered");
		}

		for metatile in &metatiles {
			assert!(
				metatile.points().any(|p| bound.contains(z, p.x, p.y)),
				"{metatile} does not intersect {bound}"
			);
		}

		let size = metatile_size(z);
		let columns = max_x / size - min_x / size + 1;
		let rows = max_y / size - min_y / size + 1;
		assert_eq!(metatiles.len() as u32, columns * rows);
	}

	#[test]
	fn restartable() {
		let bound = TileBound::new(10, 0, 20, 0, 20, false).unwrap();
		let mut first = bound_to_metatiles(&bound, "a");
		assert!(first.next().is_some());
		assert_eq!(bound_to_metatiles(&bound, "a").count(), 9);
		assert_eq!(first.count(), 8);
	}

	#[test]
	fn invalid_zoom_is_reported() {
		let bound = TileBound::new_full(21).unwrap();
		let mut iter = bound_to_metatiles(&bound, "a");
		let first = iter.next().unwrap();
		assert!(metatiles_core::TileError::is_invalid_format(&first.unwrap_err()));
		assert!(iter.next().is_none());
		assert_eq!(bound_to_metatiles(&bound, "a").filter_map(Result::ok).count(), 0);
	}

	#[test]
	fn recent_metatiles_evicts_oldest() {
		let tile = |x: u32| Metatile::from_tile(&Tile::new(10, x * 8, 0, "")).unwrap();
		let mut recent = RecentMetatiles::new(1);
		assert_eq!(recent.capacity, 8);
		for x in 0..9 {
			recent.push(tile(x));
		}
		assert!(!recent.contains(&tile(0)));
		assert!(recent.contains(&tile(1)));
		assert!(recent.contains(&tile(8)));
	}
}

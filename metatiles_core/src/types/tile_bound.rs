//! Inclusive rectangular tile ranges at a single zoom level.
//!
//! Backends differ in how they number rows: metatiles count from the top (XYZ), MBTiles counts
//! from the bottom (TMS). A [`TileBound`] keeps the extrema exactly as its source reported them and
//! remembers the row order in `flip_y`. Every query takes top-down coordinates and flips them on the
//! fly, so the stored extrema never change.

use crate::{Point, TileError, world_size};
use anyhow::{Result, bail};
use std::fmt;

/// Highest zoom level a bound may describe. This is wider than the metatile limit because MBTiles
/// files may contain deeper levels.
const MAX_BOUND_LEVEL: u8 = 31;

/// An inclusive range `[min_x, max_x] × [min_y, max_y]` of tiles at zoom level `z`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileBound {
	z: u8,
	min_x: u32,
	max_x: u32,
	min_y: u32,
	max_y: u32,
	flip_y: bool,
}

impl TileBound {
	/// Creates a bound. With `flip_y` set, `min_y`/`max_y` are bottom-up row numbers.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if a minimum exceeds its maximum or a value lies outside
	/// the zoom level.
	pub fn new(z: u8, min_x: u32, max_x: u32, min_y: u32, max_y: u32, flip_y: bool) -> Result<TileBound> {
		if z > MAX_BOUND_LEVEL {
			bail!(TileError::InvalidFormat(format!("zoom level {z} must be <= {MAX_BOUND_LEVEL}")));
		}
		if min_x > max_x || min_y > max_y {
			bail!(TileError::InvalidFormat(format!(
				"bound x:{min_x}-{max_x} y:{min_y}-{max_y} has a minimum above its maximum"
			)));
		}
		let max = world_size(z) - 1;
		if u64::from(max_x) > max || u64::from(max_y) > max {
			bail!(TileError::InvalidFormat(format!(
				"bound x:{min_x}-{max_x} y:{min_y}-{max_y} exceeds zoom level {z} (max {max})"
			)));
		}
		Ok(TileBound {
			z,
			min_x,
			max_x,
			min_y,
			max_y,
			flip_y,
		})
	}

	/// Creates a bound covering every tile of zoom level `z`.
	pub fn new_full(z: u8) -> Result<TileBound> {
		if z > MAX_BOUND_LEVEL {
			bail!(TileError::InvalidFormat(format!("zoom level {z} must be <= {MAX_BOUND_LEVEL}")));
		}
		let max = (world_size(z) - 1) as u32;
		TileBound::new(z, 0, max, 0, max, false)
	}

	pub fn z(&self) -> u8 {
		self.z
	}

	pub fn min_x(&self) -> u32 {
		self.min_x
	}

	pub fn max_x(&self) -> u32 {
		self.max_x
	}

	pub fn min_y(&self) -> u32 {
		self.min_y
	}

	pub fn max_y(&self) -> u32 {
		self.max_y
	}

	pub fn flip_y(&self) -> bool {
		self.flip_y
	}

	pub fn width(&self) -> u32 {
		self.max_x - self.min_x + 1
	}

	pub fn height(&self) -> u32 {
		self.max_y - self.min_y + 1
	}

	/// Number of tiles inside the bound.
	pub fn count(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	/// Converts a row between top-down and bottom-up numbering at this zoom level.
	fn flipped_row(&self, y: u32) -> u32 {
		((world_size(self.z) - 1) as u32) - y
	}

	/// Returns the same tiles as a bound with top-down rows.
	pub fn to_top_down(&self) -> TileBound {
		if !self.flip_y {
			return *self;
		}
		TileBound {
			min_y: self.flipped_row(self.max_y),
			max_y: self.flipped_row(self.min_y),
			flip_y: false,
			..*self
		}
	}

	/// Checks whether the top-down coordinate `(z, x, y)` lies inside the bound.
	pub fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		if z != self.z || x < self.min_x || x > self.max_x {
			return false;
		}
		if u64::from(y) >= world_size(z) {
			return false;
		}
		let row = if self.flip_y { self.flipped_row(y) } else { y };
		row >= self.min_y && row <= self.max_y
	}

	/// Iterates over all top-down coordinates inside the bound, x-major: the outer loop walks the
	/// columns, the inner loop walks the rows of one column.
	pub fn points(&self) -> BoundPoints {
		BoundPoints::new(&self.to_top_down())
	}
}

impl fmt::Display for TileBound {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Bound(z:{} x:{}-{} y:{}-{})",
			self.z, self.min_x, self.max_x, self.min_y, self.max_y
		)
	}
}

impl fmt::Debug for TileBound {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.flip_y {
			write!(f, "{self} (flipped)")
		} else {
			write!(f, "{self}")
		}
	}
}

/// Iterator over the points of a top-down [`TileBound`], see [`TileBound::points`].
#[derive(Clone, Debug)]
pub struct BoundPoints {
	next: Option<Point>,
	min_y: u32,
	max_x: u32,
	max_y: u32,
}

impl BoundPoints {
	fn new(bound: &TileBound) -> BoundPoints {
		BoundPoints {
			next: Some(Point::new(bound.min_x, bound.min_y)),
			min_y: bound.min_y,
			max_x: bound.max_x,
			max_y: bound.max_y,
		}
	}
}

impl Iterator for BoundPoints {
	type Item = Point;

	fn next(&mut self) -> Option<Point> {
		let current = self.next?;
		self.next = if current.y < self.max_y {
			Some(Point::new(current.x, current.y + 1))
		} else if current.x < self.max_x {
			Some(Point::new(current.x + 1, self.min_y))
		} else {
			None
		};
		Some(current)
	}
}

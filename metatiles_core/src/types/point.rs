use std::fmt;

/// A column/row pair, either absolute at some zoom level or relative to a metatile origin.
///
/// Points order x-major (first by `x`, then by `y`), which is the slot order of a metatile index,
/// so a `BTreeMap<Point, _>` iterates in the same order the payloads are stored.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
	pub x: u32,
	pub y: u32,
}

impl Point {
	pub fn new(x: u32, y: u32) -> Point {
		Point { x, y }
	}
}

impl From<(u32, u32)> for Point {
	fn from((x, y): (u32, u32)) -> Self {
		Point { x, y }
	}
}

impl fmt::Debug for Point {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Point({}, {})", self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeMap;

	#[test]
	fn orders_x_major() {
		let mut map = BTreeMap::new();
		for (x, y) in [(1, 0), (0, 1), (1, 1), (0, 0)] {
			map.insert(Point::new(x, y), ());
		}
		let keys: Vec<Point> = map.into_keys().collect();
		assert_eq!(
			keys,
			vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 0), Point::new(1, 1)]
		);
	}

	#[test]
	fn debug() {
		assert_eq!(format!("{:?}", Point::from((3, 4))), "Point(3, 4)");
	}
}

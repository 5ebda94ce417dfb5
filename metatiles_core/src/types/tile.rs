use crate::Point;
use std::fmt;

/// A single tile of a rendering style.
///
/// The style is part of the identity: two tiles at the same coordinate but of different styles
/// are different tiles.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Tile {
	pub z: u8,
	pub x: u32,
	pub y: u32,
	pub style: String,
	pub ext: String,
}

impl Tile {
	/// Creates a tile with the default `.png` extension.
	pub fn new(z: u8, x: u32, y: u32, style: &str) -> Tile {
		Tile {
			z,
			x,
			y,
			style: style.to_owned(),
			ext: String::from(".png"),
		}
	}

	pub fn with_ext(mut self, ext: &str) -> Tile {
		self.ext = ext.to_owned();
		self
	}

	pub fn point(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

impl fmt::Debug for Tile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Tile(z:{}, x:{}, y:{}, style:{}, ext:{})",
			self.z, self.x, self.y, self.style, self.ext
		)
	}
}

//! Metatile addressing.
//!
//! A [`Metatile`] is identified by its style, its zoom level and the hash of its origin. Its
//! origin and extent are always decoded from the hash, so they cannot drift apart.
//!
//! ```rust
//! use metatiles_container::Metatile;
//! use metatiles_core::Tile;
//!
//! let metatile = Metatile::from_url("mapname/10/0/0/33/180/128.meta").unwrap();
//! assert_eq!(metatile.to_string(), "Metatile(z:10, x:696-703, y:320-327, style:mapname)");
//! assert!(metatile.contains(&Tile::new(10, 697, 321, "mapname")));
//! ```

use anyhow::{Result, bail};
use lazy_static::lazy_static;
use metatiles_core::*;
use regex::Regex;
use std::{
	fmt,
	hash::{Hash, Hasher},
	path::{Path, PathBuf},
};

lazy_static! {
	static ref META_URL_RE: Regex =
		Regex::new(r"([^/]+)/(\d+)/(\d+)/(\d+)/(\d+)/(\d+)/(\d+)\.meta$").unwrap();
}

/// The square block of tiles stored in one `.meta` file.
#[derive(Clone)]
pub struct Metatile {
	z: u8,
	hash: MetatileHash,
	style: String,
}

impl Metatile {
	/// Creates a metatile from its hash.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if `z` exceeds [`MAX_ZOOM_LEVEL`], or if the decoded
	/// origin is not aligned to the metatile size or lies outside the zoom level.
	pub fn new(z: u8, hash: MetatileHash, style: &str) -> Result<Metatile> {
		if z > MAX_ZOOM_LEVEL {
			bail!(TileError::InvalidFormat(format!(
				"zoom level {z} exceeds the maximum metatile zoom level {MAX_ZOOM_LEVEL}"
			)));
		}
		check_origin(z, hash.to_xy())?;
		Ok(Metatile {
			z,
			hash,
			style: style.to_owned(),
		})
	}

	/// Returns the metatile containing `tile`.
	pub fn from_tile(tile: &Tile) -> Result<Metatile> {
		Metatile::new(tile.z, MetatileHash::from_xy(tile.x, tile.y), &tile.style)
	}

	/// Returns the metatile of `style` at zoom `z` that contains the tile `(x, y)`.
	pub fn from_coord(style: &str, z: u8, x: u32, y: u32) -> Result<Metatile> {
		Metatile::new(z, MetatileHash::from_xy(x, y), style)
	}

	/// Creates a metatile from the hash bytes of a parsed path.
	pub fn from_hash_path(style: &str, z: u8, hashes: [u8; HASH_LENGTH]) -> Result<Metatile> {
		Metatile::new(z, MetatileHash::from_bytes(hashes), style)
	}

	/// Parses a metatile path of the form `.../style/z/h0/h1/h2/h3/h4.meta`.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if the path does not follow this layout or encodes an
	/// invalid metatile.
	pub fn from_url(url: &str) -> Result<Metatile> {
		let invalid = || TileError::InvalidFormat(format!("unable to convert '{url}' to a metatile"));

		let captures = META_URL_RE.captures(url).ok_or_else(invalid)?;
		let style = &captures[1];
		let z: u8 = captures[2].parse().map_err(|_| invalid())?;

		let mut hashes = [0u8; HASH_LENGTH];
		for (i, hash) in hashes.iter_mut().enumerate() {
			*hash = captures[i + 3].parse().map_err(|_| invalid())?;
		}

		Metatile::from_hash_path(style, z, hashes)
	}

	/// Parses a filesystem path, see [`Metatile::from_url`].
	pub fn from_path(path: &Path) -> Result<Metatile> {
		let url = path.to_string_lossy().replace('\\', "/");
		Metatile::from_url(&url)
	}

	pub fn z(&self) -> u8 {
		self.z
	}

	pub fn hash(&self) -> &MetatileHash {
		&self.hash
	}

	pub fn style(&self) -> &str {
		&self.style
	}

	/// Column of the top left tile.
	pub fn x(&self) -> u32 {
		self.hash.to_xy().x
	}

	/// Row of the top left tile.
	pub fn y(&self) -> u32 {
		self.hash.to_xy().y
	}

	pub fn max_x(&self) -> u32 {
		self.x() + self.size() - 1
	}

	pub fn max_y(&self) -> u32 {
		self.y() + self.size() - 1
	}

	/// Number of tiles along one edge: `min(8, 2^z)`.
	pub fn size(&self) -> u32 {
		metatile_size(self.z)
	}

	/// Checks whether `tile` belongs to this metatile, including its style.
	pub fn contains(&self, tile: &Tile) -> bool {
		tile.style == self.style && self.contains_coord(tile.z, tile.x, tile.y)
	}

	/// Checks whether the coordinate belongs to this metatile, ignoring the style.
	pub fn contains_coord(&self, z: u8, x: u32, y: u32) -> bool {
		let origin = self.hash.to_xy();
		z == self.z && x >= origin.x && x <= self.max_x() && y >= origin.y && y <= self.max_y()
	}

	/// Position of the coordinate relative to the origin, or `None` if it lies outside.
	pub fn offset_of(&self, z: u8, x: u32, y: u32) -> Option<Point> {
		if !self.contains_coord(z, x, y) {
			return None;
		}
		Some(Point::new(x - self.x(), y - self.y()))
	}

	/// Location of the metatile below `base_dir`: `base_dir/style/z/h0/h1/h2/h3/h4.meta`.
	///
	/// Neighbouring metatiles share the leading directories.
	pub fn path(&self, base_dir: &Path) -> PathBuf {
		let [h0, h1, h2, h3, h4] = *self.hash.as_bytes();
		base_dir
			.join(&self.style)
			.join(self.z.to_string())
			.join(h0.to_string())
			.join(h1.to_string())
			.join(h2.to_string())
			.join(h3.to_string())
			.join(format!("{h4}{METATILE_EXTENSION}"))
	}

	/// All tile coordinates inside the metatile, x-major.
	///
	/// This is the slot order of the metatile index.
	pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
		let Point { x, y } = self.hash.to_xy();
		let size = self.size();
		(x..x + size).flat_map(move |xx| (y..y + size).map(move |yy| Point::new(xx, yy)))
	}
}

/// Checks that `origin` is a valid metatile origin at zoom level `z`.
pub(crate) fn check_origin(z: u8, origin: Point) -> Result<()> {
	let size = metatile_size(z);
	let world = world_size(z);
	if u64::from(origin.x) >= world || u64::from(origin.y) >= world {
		bail!(TileError::InvalidFormat(format!(
			"metatile origin {}/{} lies outside of zoom level {z}",
			origin.x, origin.y
		)));
	}
	if origin.x % size != 0 || origin.y % size != 0 {
		bail!(TileError::InvalidFormat(format!(
			"metatile origin {}/{} is not aligned to {size} tiles",
			origin.x, origin.y
		)));
	}
	Ok(())
}

impl PartialEq for Metatile {
	fn eq(&self, other: &Self) -> bool {
		self.style == other.style && self.z == other.z && self.hash.to_xy() == other.hash.to_xy()
	}
}

impl Eq for Metatile {}

impl Hash for Metatile {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.style.hash(state);
		self.z.hash(state);
		self.hash.to_xy().hash(state);
	}
}

impl fmt::Display for Metatile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Metatile(z:{}, x:{}-{}, y:{}-{}, style:{})",
			self.z,
			self.x(),
			self.max_x(),
			self.y(),
			self.max_y(),
			self.style
		)
	}
}

impl fmt::Debug for Metatile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{self}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn mapname(z: u8, x: u32, y: u32) -> Tile {
		Tile::new(z, x, y, "mapname")
	}

	#[test]
	fn from_url() {
		let metatile = Metatile::from_url("mapname/10/0/0/33/180/128.meta").unwrap();
		assert_eq!(metatile.to_string(), "Metatile(z:10, x:696-703, y:320-327, style:mapname)");
		assert_eq!((metatile.x(), metatile.y()), (696, 320));
		assert_eq!(
			Point::new(metatile.x(), metatile.y()),
			MetatileHash::from_bytes([0, 0, 33, 180, 128]).to_xy()
		);
		assert_eq!(metatile.style(), "mapname");
		assert_eq!(metatile.z(), 10);
	}

	#[test]
	fn from_url_with_prefix() {
		let metatile = Metatile::from_url("/var/cache/tiles/mapname/10/0/0/33/180/128.meta").unwrap();
		assert_eq!(metatile, Metatile::from_url("mapname/10/0/0/33/180/128.meta").unwrap());
	}

	#[rstest]
	#[case("mapname/10/0/0/33/180.meta")]
	#[case("mapname/10/0/0/33/180/128.png")]
	#[case("mapname/10/0/0/33/180/128.meta.tmp")]
	#[case("mapname/10/0/0/33/999/128.meta")]
	#[case("mapname/999/0/0/33/180/128.meta")]
	#[case("mapname/21/0/0/0/0/0.meta")]
	#[case("mapname/10/0/0/33/180/129.meta")]
	#[case("mapname/2/0/0/0/0/128.meta")]
	fn from_url_rejects(#[case] url: &str) {
		let err = Metatile::from_url(url).unwrap_err();
		assert!(TileError::is_invalid_format(&err), "{url}: {err}");
	}

	#[test]
	fn from_tile() {
		let metatile = Metatile::from_tile(&mapname(10, 697, 321)).unwrap();
		assert_eq!(metatile.to_string(), "Metatile(z:10, x:696-703, y:320-327, style:mapname)");
	}

	#[rstest]
	#[case(0, 1)]
	#[case(1, 2)]
	#[case(2, 4)]
	#[case(3, 8)]
	#[case(18, 8)]
	fn size(#[case] z: u8, #[case] edge: u32) {
		let metatile = Metatile::from_tile(&mapname(z, 0, 0)).unwrap();
		assert_eq!(metatile.size(), edge);
		assert_eq!(metatile.points().count() as u32, edge * edge);
	}

	#[test]
	fn contains() {
		let metatile = Metatile::from_tile(&Tile::new(10, 696, 320, "")).unwrap();
		assert!(metatile.contains(&Tile::new(10, 696, 320, "")));
		assert!(metatile.contains(&Tile::new(10, 703, 327, "")));
		assert!(!metatile.contains(&Tile::new(10, 704, 328, "")));
		assert!(!metatile.contains(&Tile::new(10, 695, 319, "")));
		assert!(!metatile.contains(&Tile::new(11, 696, 320, "")));
		assert!(!metatile.contains(&Tile::new(10, 696, 320, "mapname")));
	}

	#[test]
	fn contains_every_tile_it_is_built_from() {
		for z in [0u8, 1, 2, 3, 7, 20] {
			let max = (world_size(z) - 1) as u32;
			for (x, y) in [(0, 0), (max, max), (max / 3, max / 2), (max, 0)] {
				let tile = mapname(z, x, y);
				let metatile = Metatile::from_tile(&tile).unwrap();
				assert!(metatile.contains(&tile), "{metatile} must contain {tile:?}");
				if metatile.x() > 0 {
					assert!(!metatile.contains(&mapname(z, metatile.x() - 1, y)));
				}
				if metatile.y() > 0 {
					assert!(!metatile.contains(&mapname(z, x, metatile.y() - 1)));
				}
				assert!(!metatile.contains(&mapname(z, metatile.max_x() + 1, y)));
				assert!(!metatile.contains(&mapname(z, x, metatile.max_y() + 1)));
			}
		}
	}

	#[test]
	fn equality_ignores_hash_representation() {
		let a = Metatile::from_url("mapname/10/0/0/33/180/128.meta").unwrap();
		let b = Metatile::from_tile(&mapname(10, 703, 327)).unwrap();
		let c = Metatile::from_url("mapname/10/0/0/33/180/0.meta").unwrap();
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_ne!(a, Metatile::from_url("other/10/0/0/33/180/128.meta").unwrap());
	}

	#[test]
	fn path() {
		let metatile = Metatile::from_url("mapname/10/0/0/33/180/128.meta").unwrap();
		assert_eq!(
			metatile.path(Path::new("/cache")),
			PathBuf::from("/cache/mapname/10/0/0/33/180/128.meta")
		);
		assert_eq!(Metatile::from_path(&metatile.path(Path::new("/cache"))).unwrap(), metatile);

		// origin 0/4664 needs zoom level 13
		let deep = Metatile::from_url("mapname/13/0/1/2/3/8.meta").unwrap();
		assert_eq!((deep.x(), deep.y()), (0, 4664));
		assert_eq!(deep.path(Path::new("/cache")), PathBuf::from("/cache/mapname/13/0/1/2/3/8.meta"));
		let err = Metatile::from_url("mapname/10/0/1/2/3/8.meta").unwrap_err();
		assert!(TileError::is_invalid_format(&err), "{err}");
		let err = Metatile::from_url("mapname/10/0/1/2/3/4.meta").unwrap_err();
		assert!(TileError::is_invalid_format(&err), "{err}");
	}

	#[rstest]
	#[case("osm-bright/10/0/0/33/180/128.meta", "osm-bright")]
	#[case("/srv/tiles/osm.v2/10/0/0/33/180/128.meta", "osm.v2")]
	#[case("/srv/tiles/my_style/10/0/0/33/180/128.meta", "my_style")]
	fn style_names(#[case] url: &str, #[case] style: &str) {
		let metatile = Metatile::from_url(url).unwrap();
		assert_eq!(metatile.style(), style);
		assert!(metatile.contains(&Tile::new(10, 697, 321, style)));
	}

	#[test]
	fn points_are_x_major() {
		let metatile = Metatile::from_tile(&mapname(1, 1, 1)).unwrap();
		let points: Vec<(u32, u32)> = metatile.points().map(|p| (p.x, p.y)).collect();
		assert_eq!(points, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
	}

	#[test]
	fn offset_of() {
		let metatile = Metatile::from_coord("mapname", 10, 697, 321).unwrap();
		assert_eq!(metatile.offset_of(10, 697, 321), Some(Point::new(1, 1)));
		assert_eq!(metatile.offset_of(10, 703, 320), Some(Point::new(7, 0)));
		assert_eq!(metatile.offset_of(10, 704, 320), None);
		assert_eq!(metatile.offset_of(9, 697, 321), None);
	}
}

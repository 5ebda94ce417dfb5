//! A directory tree of metatiles: `base_dir/style/z/h0/h1/h2/h3/h4.meta`.

use super::TileStore;
use crate::{Metatile, MetatileReader, MetatileWriter};
use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use metatiles_core::{Blob, HASH_LENGTH, MAX_ZOOM_LEVEL, METATILE_EXTENSION, MetatileHash, Point, TileError, world_size};
use metatiles_derive::context;
use std::{
	collections::BTreeMap,
	fmt, fs,
	path::{Path, PathBuf},
};

/// Metatiles of one style below a base directory.
#[derive(Clone)]
pub struct MetatileStore {
	base_dir: PathBuf,
	style: String,
	name: String,
}

impl MetatileStore {
	/// Creates a store. The directory is created on the first write.
	pub fn new(base_dir: &Path, style: &str) -> MetatileStore {
		MetatileStore {
			base_dir: base_dir.to_path_buf(),
			style: style.to_owned(),
			name: base_dir.join(style).to_string_lossy().into_owned(),
		}
	}

	/// Creates a store for an existing directory.
	#[context("opening metatile directory {:?}", base_dir)]
	pub fn open_path(base_dir: &Path, style: &str) -> Result<MetatileStore> {
		log::debug!("open {base_dir:?} with style '{style}'");

		ensure!(fs::metadata(base_dir)?.is_dir(), "path {base_dir:?} is not a directory");
		Ok(MetatileStore::new(base_dir, style))
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	pub fn style(&self) -> &str {
		&self.style
	}

	/// The metatile that holds `(z, x, y)`.
	///
	/// # Errors
	/// Returns [`TileError::NotFound`] if the coordinate lies outside of its zoom level or deeper
	/// than metatiles go.
	pub fn metatile(&self, z: u8, x: u32, y: u32) -> Result<Metatile> {
		if z > MAX_ZOOM_LEVEL || u64::from(x) >= world_size(z) || u64::from(y) >= world_size(z) {
			bail!(TileError::NotFound(format!(
				"tile {z}/{x}/{y} cannot be stored in a metatile"
			)));
		}
		Metatile::from_coord(&self.style, z, x, y)
	}

	/// Path of the metatile file that holds `(z, x, y)`.
	pub fn path(&self, z: u8, x: u32, y: u32) -> Result<PathBuf> {
		Ok(self.metatile(z, x, y)?.path(&self.base_dir))
	}

	/// Opens the metatile file that holds `(z, x, y)`.
	///
	/// # Errors
	/// Returns [`TileError::NotFound`] if the file does not exist.
	pub fn open_metatile(&self, z: u8, x: u32, y: u32) -> Result<MetatileReader> {
		let path = self.path(z, x, y)?;
		if !path.is_file() {
			bail!(TileError::NotFound(format!("metatile {path:?} does not exist")));
		}
		MetatileReader::open_path(&path)
	}

	/// Writes the tiles of zoom level `z`, one file per metatile. Existing metatiles are replaced.
	///
	/// Every metatile is encoded before the first file is written, so invalid input leaves the
	/// directory untouched. Returns the number of metatiles written.
	#[context("writing {} tiles at zoom level {z} to '{}'", tiles.len(), self.name)]
	pub fn write_tiles(&self, z: u8, tiles: &BTreeMap<Point, Blob>) -> Result<usize> {
		let groups = tiles
			.iter()
			.into_group_map_by(|(point, _)| MetatileHash::from_xy(point.x, point.y).to_xy());

		let mut encoded = Vec::with_capacity(groups.len());
		for (origin, group) in groups.iter().sorted_by_key(|(origin, _)| **origin) {
			let metatile = self.metatile(z, origin.x, origin.y)?;
			let tiles: BTreeMap<Point, Blob> = group.iter().map(|(p, b)| (**p, (*b).clone())).collect();
			encoded.push((metatile, MetatileWriter::encode(origin.x, origin.y, z, &tiles)?));
		}

		for (metatile, blob) in &encoded {
			MetatileWriter::create(&metatile.path(&self.base_dir)).write_encoded(blob)?;
		}

		log::debug!("wrote {} metatiles at zoom level {z}", encoded.len());
		Ok(encoded.len())
	}

	/// Lists the metatiles of zoom level `z` found on disk, ordered by origin.
	///
	/// Files that do not follow the metatile layout are skipped.
	#[context("listing metatiles at zoom level {z} in '{}'", self.name)]
	pub fn metatiles(&self, z: u8) -> Result<Vec<Metatile>> {
		let dir = self.base_dir.join(&self.style).join(z.to_string());
		if !dir.is_dir() {
			return Ok(Vec::new());
		}

		let mut paths = Vec::new();
		collect_files(&dir, 4, &mut paths)?;

		let mut metatiles = Vec::new();
		for path in paths {
			match parse_hash_path(&dir, &path, &self.style, z) {
				Ok(metatile) => metatiles.push(metatile),
				Err(err) => log::warn!("skipping {path:?}: {err}"),
			}
		}

		metatiles.sort_by_key(|metatile| (metatile.x(), metatile.y()));
		Ok(metatiles)
	}
}

/// Parses `h0/h1/h2/h3/h4.meta` relative to the zoom level directory `dir`.
///
/// The style and zoom level are taken from the store, not from the path, so any style name works.
fn parse_hash_path(dir: &Path, path: &Path, style: &str, z: u8) -> Result<Metatile> {
	let invalid = || TileError::InvalidFormat(format!("{path:?} is not a metatile hash path"));

	let relative = path.strip_prefix(dir).map_err(|_| invalid())?;
	let segments: Vec<String> = relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy().into_owned())
		.collect();
	if segments.len() != HASH_LENGTH {
		bail!(invalid());
	}

	let mut hashes = [0u8; HASH_LENGTH];
	for (i, (hash, segment)) in hashes.iter_mut().zip(&segments).enumerate() {
		let segment = if i == HASH_LENGTH - 1 {
			segment.strip_suffix(METATILE_EXTENSION).ok_or_else(invalid)?
		} else {
			segment.as_str()
		};
		*hash = segment.parse().map_err(|_| invalid())?;
	}
	Metatile::from_hash_path(style, z, hashes)
}

/// Collects the metatile files exactly `depth` directories below `dir`.
fn collect_files(dir: &Path, depth: usize, paths: &mut Vec<PathBuf>) -> Result<()> {
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if depth == 0 {
			if path.is_file() && path.to_string_lossy().ends_with(METATILE_EXTENSION) {
				paths.push(path);
			}
		} else if path.is_dir() {
			collect_files(&path, depth - 1, paths)?;
		}
	}
	Ok(())
}

impl TileStore for MetatileStore {
	fn name(&self) -> &str {
		&self.name
	}

	fn read_tile(&mut self, z: u8, x: u32, y: u32) -> Result<Blob> {
		let mut reader = self.open_metatile(z, x, y)?;
		TileStore::read_tile(&mut reader, z, x, y)
	}

	/// Checks whether the metatile file exists and has the slot of the coordinate populated.
	fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		self
			.open_metatile(z, x, y)
			.is_ok_and(|reader| TileStore::contains(&reader, z, x, y))
	}
}

impl fmt::Debug for MetatileStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MetatileStore")
			.field("base_dir", &self.base_dir)
			.field("style", &self.style)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;

	fn tiles(points: &[(u32, u32)]) -> BTreeMap<Point, Blob> {
		points
			.iter()
			.map(|&(x, y)| (Point::new(x, y), Blob::from(format!("{x}/{y}").as_str())))
			.collect()
	}

	#[test]
	fn write_and_read() -> Result<()> {
		let dir = TempDir::new()?;
		let mut store = MetatileStore::new(dir.path(), "osm");

		let written = store.write_tiles(10, &tiles(&[(695, 319), (696, 320), (697, 321), (703, 327)]))?;
		assert_eq!(written, 2);

		assert!(
			dir.path()
				.join("osm/10/0/0/33/180/128.meta")
				.is_file()
		);
		assert_eq!(store.read_tile(10, 697, 321)?.as_slice(), b"697/321");
		assert_eq!(store.read_tile(10, 695, 319)?.as_slice(), b"695/319");
		assert!(store.contains(10, 703, 327));
		assert!(!store.contains(10, 698, 321));
		assert!(!store.contains(10, 0, 0));
		Ok(())
	}

	#[test]
	fn missing_tiles_are_not_found() -> Result<()> {
		let dir = TempDir::new()?;
		let mut store = MetatileStore::new(dir.path(), "osm");
		store.write_tiles(3, &tiles(&[(1, 1)]))?;

		for (z, x, y) in [(3, 1, 2), (3, 0, 0), (4, 1, 1), (3, 8, 0), (21, 0, 0)] {
			let err = store.read_tile(z, x, y).unwrap_err();
			assert!(TileError::is_not_found(&err), "{z}/{x}/{y}: {err}");
		}
		Ok(())
	}

	#[test]
	fn list_metatiles() -> Result<()> {
		let dir = TempDir::new()?;
		let store = MetatileStore::new(dir.path(), "osm");
		assert_eq!(store.metatiles(5)?, Vec::new());

		store.write_tiles(5, &tiles(&[(31, 0), (0, 31), (9, 9)]))?;
		MetatileStore::new(dir.path(), "other").write_tiles(5, &tiles(&[(16, 16)]))?;
		fs::write(dir.path().join("osm/5/0/0/0/0/readme.txt"), "not a metatile")?;

		let origins: Vec<(u32, u32)> = store.metatiles(5)?.iter().map(|m| (m.x(), m.y())).collect();
		assert_eq!(origins, [(0, 24), (8, 8), (24, 0)]);
		assert_eq!(store.metatiles(4)?, Vec::new());
		Ok(())
	}

	#[test]
	fn styles_with_punctuation() -> Result<()> {
		let dir = TempDir::new()?;
		for style in ["osm-bright", "osm.v2"] {
			let mut store = MetatileStore::new(dir.path(), style);
			assert_eq!(store.write_tiles(10, &tiles(&[(697, 321)]))?, 1);

			assert_eq!(store.read_tile(10, 697, 321)?.as_slice(), b"697/321");
			assert!(store.contains(10, 697, 321));

			let listed = store.metatiles(10)?;
			assert_eq!(listed, [Metatile::from_coord(style, 10, 696, 320)?]);

			let reader = store.open_metatile(10, 697, 321)?;
			assert_eq!(reader.metatile().style(), style);
		}
		Ok(())
	}

	#[test]
	fn invalid_tiles_leave_directory_untouched() -> Result<()> {
		let dir = TempDir::new()?;
		let store = MetatileStore::new(dir.path(), "osm");

		// (2, 0) is fine, (5, 0) lies outside of zoom level 2
		let err = store.write_tiles(2, &tiles(&[(2, 0), (5, 0)])).unwrap_err();
		assert!(TileError::is_not_found(&err) || TileError::is_invalid_format(&err), "{err}");
		assert!(!dir.path().join("osm").exists());

		// the first metatile is valid, the second one is outside of zoom level 4
		assert!(store.write_tiles(4, &tiles(&[(0, 0), (16, 0)])).is_err());
		assert!(!dir.path().join("osm").exists());
		Ok(())
	}

	#[test]
	fn open_path_requires_directory() -> Result<()> {
		let dir = TempDir::new()?;
		assert!(MetatileStore::open_path(dir.path(), "osm").is_ok());
		assert!(MetatileStore::open_path(&dir.path().join("missing"), "osm").is_err());

		let file = dir.path().join("file.txt");
		fs::write(&file, "")?;
		assert!(MetatileStore::open_path(&file, "osm").is_err());
		Ok(())
	}

	#[test]
	fn debug() {
		let store = MetatileStore::new(Path::new("/data"), "osm");
		assert_eq!(format!("{store:?}"), "MetatileStore { base_dir: \"/data\", style: \"osm\" }");
		assert_eq!(store.name(), "/data/osm");
	}
}

//! Reading `.meta` files.

use super::{Header, Metatile, MetatileIndex, invalid_on_eof};
use anyhow::{Result, bail};
use metatiles_core::{Blob, Point, Tile, TileError};
use metatiles_derive::context;
use std::{
	collections::BTreeMap,
	fmt,
	fs::File,
	io::{BufReader, Read, Seek, SeekFrom},
	path::Path,
};

/// Random access to the tiles of one metatile.
///
/// The header and the index are parsed when the reader is created; payloads are read on demand.
pub struct MetatileReader<R = BufReader<File>> {
	name: String,
	reader: R,
	header: Header,
	index: MetatileIndex,
	metatile: Metatile,
}

impl MetatileReader {
	/// Opens a metatile file.
	///
	/// If the path follows the `style/z/h0/h1/h2/h3/h4.meta` layout, the style is taken from it and
	/// the header must describe the same metatile. Otherwise the style is empty.
	///
	/// # Errors
	/// Returns the [`std::io::Error`] if the file cannot be opened, or [`TileError::InvalidFormat`]
	/// if the content is malformed or disagrees with the path.
	#[context("opening metatile '{}'", path.display())]
	pub fn open_path(path: &Path) -> Result<MetatileReader> {
		log::debug!("open {path:?}");

		let file = File::open(path)?;
		let from_path = Metatile::from_path(path).ok();
		let style = from_path.as_ref().map_or("", Metatile::style);

		let reader = MetatileReader::from_reader(BufReader::new(file), style, &path.to_string_lossy())?;

		if let Some(expected) = from_path {
			if expected != reader.metatile {
				bail!(TileError::InvalidFormat(format!(
					"header describes {} but the path describes {expected}",
					reader.metatile
				)));
			}
		}

		Ok(reader)
	}
}

impl<R: Read + Seek> MetatileReader<R> {
	/// Parses header and index from any seekable stream.
	pub fn from_reader(mut reader: R, style: &str, name: &str) -> Result<MetatileReader<R>> {
		let stream_len = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;

		let header = Header::read(&mut reader)?;
		let index = MetatileIndex::read(&mut reader, &header, stream_len)?;
		let metatile = header.metatile(style)?;

		log::trace!("loaded {header} with {} tiles from '{name}'", index.len());

		Ok(MetatileReader {
			name: name.to_owned(),
			reader,
			header,
			index,
			metatile,
		})
	}

	pub fn header(&self) -> &Header {
		&self.header
	}

	pub fn index(&self) -> &MetatileIndex {
		&self.index
	}

	/// The metatile described by the header.
	pub fn metatile(&self) -> &Metatile {
		&self.metatile
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Reading a metatile as a whole is not supported, use [`Self::read_tile`] or
	/// [`Self::read_all_tiles`].
	pub fn read(&mut self) -> Result<Blob> {
		bail!(TileError::UnsupportedMode(format!(
			"'{}' can only be read tile by tile",
			self.name
		)))
	}

	/// Reads the tile at `(dx, dy)` relative to the metatile origin.
	///
	/// # Errors
	/// Returns [`TileError::NotFound`] if the slot is empty or does not exist.
	#[context("reading tile {dx}/{dy} of {}", self.metatile)]
	pub fn read_tile(&mut self, dx: u32, dy: u32) -> Result<Blob> {
		let Some(entry) = self.index.get(dx, dy).copied() else {
			bail!(TileError::NotFound(format!("{} has no tile at {dx}/{dy}", self.metatile)));
		};

		log::trace!("read tile {dx}/{dy}: {entry:?}");

		self
			.reader
			.seek(SeekFrom::Start(self.header.payload_start() + entry.offset))?;
		let mut buffer = vec![0u8; entry.size as usize];
		self.reader.read_exact(&mut buffer).map_err(invalid_on_eof("payload"))?;
		Ok(Blob::from(buffer))
	}

	/// Reads every stored tile, keyed by its absolute coordinate.
	///
	/// The payload region is read in one go.
	#[context("reading all tiles of {}", self.metatile)]
	pub fn read_all_tiles(&mut self) -> Result<BTreeMap<Point, Blob>> {
		let end = self
			.index
			.iter()
			.map(|(_, entry)| entry.offset + entry.size)
			.max()
			.unwrap_or(0);

		let mut payload = vec![0u8; end as usize];
		self.reader.seek(SeekFrom::Start(self.header.payload_start()))?;
		self.reader.read_exact(&mut payload).map_err(invalid_on_eof("payload"))?;

		let origin = Point::new(self.header.x, self.header.y);
		Ok(self
			.index
			.iter()
			.map(|(offset, entry)| {
				let start = entry.offset as usize;
				let blob = Blob::from(&payload[start..start + entry.size as usize]);
				(Point::new(origin.x + offset.x, origin.y + offset.y), blob)
			})
			.collect())
	}

	/// Checks whether `tile` belongs to this metatile. Says nothing about the slot being populated.
	pub fn contains(&self, tile: &Tile) -> bool {
		self.metatile.contains(tile)
	}

	/// Absolute coordinates of all stored tiles, in slot order.
	pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
		let (x, y) = (self.header.x, self.header.y);
		self.index.iter().map(move |(offset, _)| Point::new(x + offset.x, y + offset.y))
	}
}

impl<R> fmt::Debug for MetatileReader<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MetatileReader")
			.field("name", &self.name)
			.field("header", &self.header)
			.field("tiles", &self.index.len())
			.finish()
	}
}

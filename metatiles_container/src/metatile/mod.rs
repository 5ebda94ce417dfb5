//! mod_tile metatiles: addressing and the `.meta` container format.
//!
//! A metatile bundles up to 8x8 neighbouring tiles of one zoom level into a single file:
//!
//! ```text
//! [Header: magic, count, x, y, z][Index: count x (offset, size)][Payload: concatenated tiles]
//! ```
//!
//! - [`Metatile`] derives the container of a tile and its location on disk,
//! - [`bound_to_metatiles`] lists the containers covering a tile range,
//! - [`MetatileReader`] and [`MetatileWriter`] read and write single files,
//! - [`open`] picks one of them from a file mode.

mod address;
mod decompose;
mod header;
mod index;
mod reader;
mod writer;

pub use address::Metatile;
pub use decompose::{MetatileIter, bound_to_metatiles};
pub use header::{ENTRY_SIZE, HEADER_SIZE, Header, MAGIC};
pub use index::{IndexEntry, MetatileIndex};
pub use reader::MetatileReader;
pub use writer::MetatileWriter;

use crate::OpenMode;
use anyhow::Result;
use metatiles_core::TileError;
use std::{io, path::Path};

/// A metatile file opened with [`open`].
#[derive(Debug)]
pub enum MetatileFile {
	Reader(MetatileReader),
	Writer(MetatileWriter),
}

/// Opens a metatile file with a file-like mode: `"rb"` reads an existing file, `"wb"` prepares a
/// writer for the path.
///
/// # Errors
/// Returns [`TileError::UnsupportedMode`] for any other mode. Opening a missing file with `"rb"`
/// returns the underlying [`std::io::Error`].
pub fn open(path: &Path, mode: &str) -> Result<MetatileFile> {
	Ok(match mode.parse::<OpenMode>()? {
		OpenMode::Read => MetatileFile::Reader(MetatileReader::open_path(path)?),
		OpenMode::Write => MetatileFile::Writer(MetatileWriter::create(path)),
	})
}

/// Maps an unexpected end of file while reading `what` to [`TileError::InvalidFormat`].
pub(crate) fn invalid_on_eof(what: &'static str) -> impl Fn(io::Error) -> anyhow::Error {
	move |err| {
		if err.kind() == io::ErrorKind::UnexpectedEof {
			TileError::InvalidFormat(format!("{what} is truncated")).into()
		} else {
			err.into()
		}
	}
}

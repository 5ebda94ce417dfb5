//! File-like open modes accepted by [`crate::metatile::open`] and [`crate::mbtiles::open`].

use anyhow::{Result, bail};
use metatiles_core::TileError;
use std::{fmt, str::FromStr};

/// How a container is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
	/// `"rb"`: read an existing container.
	Read,
	/// `"wb"`: create or replace a container.
	Write,
}

impl OpenMode {
	/// Fails with [`TileError::UnsupportedMode`] unless `self` is one of `supported`.
	pub fn ensure_one_of(self, supported: &[OpenMode], backend: &str) -> Result<OpenMode> {
		if !supported.contains(&self) {
			bail!(TileError::UnsupportedMode(format!("{backend} cannot be opened with mode '{self}'")));
		}
		Ok(self)
	}
}

impl FromStr for OpenMode {
	type Err = anyhow::Error;

	fn from_str(mode: &str) -> Result<Self> {
		match mode {
			"rb" => Ok(OpenMode::Read),
			"wb" => Ok(OpenMode::Write),
			_ => bail!(TileError::UnsupportedMode(format!("mode '{mode}' is not supported"))),
		}
	}
}

impl fmt::Display for OpenMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			OpenMode::Read => "rb",
			OpenMode::Write => "wb",
		})
	}
}

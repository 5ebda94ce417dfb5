//! Typed failures raised by the tile stores.
//!
//! Every fallible function in the workspace returns [`anyhow::Result`]. Failures that callers are
//! expected to react to are raised as a [`TileError`] and can be recovered with
//! `err.downcast_ref::<TileError>()`, even after context has been attached.
//! I/O failures are not wrapped: they stay a [`std::io::Error`] inside the `anyhow::Error`.

use std::fmt;

/// The kinds of failure a tile store reports, each carrying a human readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
	/// The requested tile, slot or coordinate does not exist.
	NotFound(String),
	/// A path, header, index or metadata value does not match the expected format.
	InvalidFormat(String),
	/// The requested open mode or operation is not supported by the backend.
	UnsupportedMode(String),
}

impl TileError {
	/// Returns `true` if `err` carries a [`TileError::NotFound`].
	pub fn is_not_found(err: &anyhow::Error) -> bool {
		matches!(err.downcast_ref::<TileError>(), Some(TileError::NotFound(_)))
	}

	/// Returns `true` if `err` carries a [`TileError::InvalidFormat`].
	pub fn is_invalid_format(err: &anyhow::Error) -> bool {
		matches!(err.downcast_ref::<TileError>(), Some(TileError::InvalidFormat(_)))
	}

	/// Returns `true` if `err` carries a [`TileError::UnsupportedMode`].
	pub fn is_unsupported_mode(err: &anyhow::Error) -> bool {
		matches!(err.downcast_ref::<TileError>(), Some(TileError::UnsupportedMode(_)))
	}
}

impl fmt::Display for TileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TileError::NotFound(msg) => write!(f, "not found: {msg}"),
			TileError::InvalidFormat(msg) => write!(f, "invalid format: {msg}"),
			TileError::UnsupportedMode(msg) => write!(f, "unsupported mode: {msg}"),
		}
	}
}

impl std::error::Error for TileError {}

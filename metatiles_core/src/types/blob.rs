//! [`Blob`] holds the bytes of one tile.
//!
//! The stores never look inside a blob: whatever was written to a metatile slot or an MBTiles row
//! is returned unchanged.
//!
//! ```rust
//! use metatiles_core::Blob;
//!
//! let png = Blob::from(&[0x89, b'P', b'N', b'G']);
//! assert_eq!(png.len(), 4);
//! assert_eq!(&png.as_slice()[1..], b"PNG");
//! assert_eq!(format!("{png:?}"), "Blob(4): 89 50 4e 47");
//! ```

use std::fmt;

/// An owned tile payload.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(Vec<u8>);

impl Blob {
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Payload size in bytes, as stored in a metatile index entry.
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(bytes: Vec<u8>) -> Self {
		Blob(bytes)
	}
}

impl From<&[u8]> for Blob {
	fn from(bytes: &[u8]) -> Self {
		Blob(bytes.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(bytes: &[u8; N]) -> Self {
		Blob(bytes.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(text: &str) -> Self {
		Blob(text.as_bytes().to_vec())
	}
}

impl fmt::Debug for Blob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		const PREVIEW: usize = 16;
		write!(f, "Blob({}):", self.0.len())?;
		for byte in self.0.iter().take(PREVIEW) {
			write!(f, " {byte:02x}")?;
		}
		if self.0.len() > PREVIEW {
			write!(f, " ...")?;
		}
		Ok(())
	}
}

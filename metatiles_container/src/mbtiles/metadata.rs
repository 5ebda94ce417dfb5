use anyhow::{Result, bail};
use metatiles_core::TileError;
use std::{collections::BTreeMap, fmt};

/// The entries of the `metadata` table.
///
/// `center`, `format`, `bounds`, `minzoom` and `maxzoom` are required. Everything else ends up in
/// `extra`.
#[derive(Clone, PartialEq, Eq)]
pub struct Metadata {
	pub center: String,
	pub format: String,
	pub bounds: String,
	pub minzoom: u8,
	pub maxzoom: u8,
	pub extra: BTreeMap<String, String>,
}

impl Metadata {
	/// Builds the metadata from `(name, value)` rows.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if a required entry is missing or a zoom level is not
	/// a number.
	pub fn from_entries<I>(entries: I) -> Result<Metadata>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut extra: BTreeMap<String, String> = entries.into_iter().collect();

		let mut take = |name: &str| {
			extra
				.remove(name)
				.ok_or_else(|| TileError::InvalidFormat(format!("metadata entry '{name}' is missing")))
		};
		let center = take("center")?;
		let format = take("format")?;
		let bounds = take("bounds")?;
		let minzoom = take("minzoom")?;
		let maxzoom = take("maxzoom")?;

		let minzoom = parse_zoom("minzoom", &minzoom)?;
		let maxzoom = parse_zoom("maxzoom", &maxzoom)?;
		if minzoom > maxzoom {
			bail!(TileError::InvalidFormat(format!(
				"minzoom {minzoom} is greater than maxzoom {maxzoom}"
			)));
		}

		Ok(Metadata {
			center,
			format,
			bounds,
			minzoom,
			maxzoom,
			extra,
		})
	}

	/// All entries as `(name, value)` pairs, required ones first.
	pub fn entries(&self) -> Vec<(String, String)> {
		let mut entries = vec![
			("center".to_owned(), self.center.clone()),
			("format".to_owned(), self.format.clone()),
			("bounds".to_owned(), self.bounds.clone()),
			("minzoom".to_owned(), self.minzoom.to_string()),
			("maxzoom".to_owned(), self.maxzoom.to_string()),
		];
		entries.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
		entries
	}
}

fn parse_zoom(name: &str, value: &str) -> Result<u8> {
	match value.trim().parse::<u8>() {
		Ok(zoom) => Ok(zoom),
		Err(_) => bail!(TileError::InvalidFormat(format!(
			"metadata entry '{name}' is not a zoom level: '{value}'"
		))),
	}
}

impl fmt::Display for Metadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Metadata(center='{}', format='{}', bounds='{}', minzoom={}, maxzoom={})",
			self.center, self.format, self.bounds, self.minzoom, self.maxzoom
		)
	}
}

impl fmt::Debug for Metadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{self}")?;
		if !self.extra.is_empty() {
			write!(f, " {:?}", self.extra)?;
		}
		Ok(())
	}
}

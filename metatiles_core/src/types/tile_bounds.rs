//! A collection of [`TileBound`]s with at most one bound per zoom level.

use crate::{TileBound, TileError};
use anyhow::{Result, bail};
use itertools::Itertools;
use std::fmt;

/// Per-zoom bounds of a tile store, ordered by zoom level.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TileBounds {
	bounds: Vec<TileBound>,
}

impl TileBounds {
	/// Creates the collection, sorting the bounds by zoom level.
	///
	/// # Errors
	/// Returns [`TileError::InvalidFormat`] if two bounds share a zoom level.
	pub fn new(mut bounds: Vec<TileBound>) -> Result<TileBounds> {
		bounds.sort_by_key(|bound| bound.z());
		if let Some((a, _)) = bounds.iter().tuple_windows().find(|(a, b)| a.z() == b.z()) {
			bail!(TileError::InvalidFormat(format!("zoom level {} has more than one bound", a.z())));
		}
		Ok(TileBounds { bounds })
	}

	/// Returns the bound of zoom level `z`, if there is one.
	pub fn for_zoom(&self, z: u8) -> Option<&TileBound> {
		self
			.bounds
			.binary_search_by_key(&z, |bound| bound.z())
			.ok()
			.map(|index| &self.bounds[index])
	}

	/// Checks whether the top-down coordinate `(z, x, y)` lies inside the bound of its zoom level.
	pub fn contains(&self, z: u8, x: u32, y: u32) -> bool {
		self.for_zoom(z).is_some_and(|bound| bound.contains(z, x, y))
	}

	pub fn iter(&self) -> impl Iterator<Item = &TileBound> {
		self.bounds.iter()
	}

	pub fn len(&self) -> usize {
		self.bounds.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bounds.is_empty()
	}

	/// Lowest and highest zoom level with a bound.
	pub fn zoom_range(&self) -> Option<(u8, u8)> {
		Some((self.bounds.first()?.z(), self.bounds.last()?.z()))
	}
}

impl fmt::Display for TileBounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}]", self.bounds.iter().join(", "))
	}
}

impl fmt::Debug for TileBounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileBounds{self}")
	}
}

use anyhow::{Result, bail};
use metatiles_container::Metatile;
use metatiles_core::TileError;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// base directory of the metatiles
	#[arg()]
	base_dir: PathBuf,

	/// name of the style
	#[arg()]
	style: String,

	/// zoom level
	#[arg()]
	z: u8,

	/// column of the tile
	#[arg()]
	x: u32,

	/// row of the tile, counted from the top
	#[arg()]
	y: u32,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	print!("{}", locate(arguments)?);
	Ok(())
}

fn locate(arguments: &Subcommand) -> Result<String> {
	let Subcommand { base_dir, style, z, x, y } = arguments;

	let metatile = Metatile::from_coord(style, *z, *x, *y)?;
	let Some(offset) = metatile.offset_of(*z, *x, *y) else {
		bail!(TileError::NotFound(format!("tile {z}/{x}/{y} is not part of {metatile}")));
	};

	Ok(format!(
		"{}\nmetatile: {metatile}\nslot: {}/{}\n",
		metatile.path(base_dir).display(),
		offset.x,
		offset.y
	))
}

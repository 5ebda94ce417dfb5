use anyhow::{Result, ensure};
use metatiles_container::{MBTilesReader, MetatileStore, convert_mbtiles_to_metatiles};
use metatiles_core::MAX_ZOOM_LEVEL;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles file to read
	#[arg()]
	input_file: PathBuf,

	/// base directory of the metatiles
	#[arg()]
	output_dir: PathBuf,

	/// name of the style the metatiles are stored under
	#[arg(long, short, default_value = "default", display_order = 1)]
	style: String,

	/// minimum zoom level
	#[arg(long, value_name = "int", display_order = 1)]
	min_zoom: Option<u8>,

	/// maximum zoom level
	#[arg(long, value_name = "int", display_order = 1)]
	max_zoom: Option<u8>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	eprintln!("convert from {:?} to {:?}", arguments.input_file, arguments.output_dir);

	let min_zoom = arguments.min_zoom.unwrap_or(0);
	let max_zoom = arguments.max_zoom.unwrap_or(MAX_ZOOM_LEVEL);
	ensure!(min_zoom <= max_zoom, "min zoom {min_zoom} is greater than max zoom {max_zoom}");

	let reader = MBTilesReader::open_path(&arguments.input_file)?;
	let store = MetatileStore::new(&arguments.output_dir, &arguments.style);

	let stats = convert_mbtiles_to_metatiles(&reader, &store, min_zoom..=max_zoom)?;

	eprintln!("finished converting {stats}");

	Ok(())
}

use anyhow::{Result, bail};
use metatiles_container::{MBTilesReader, MetatileReader};
use metatiles_core::TileError;
use std::path::{Path, PathBuf};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// file you want to probe
	/// supported formats are: *.mbtiles, *.meta
	#[arg(required = true, verbatim_doc_comment)]
	filename: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	eprintln!("probe {:?}", arguments.filename);

	print!("{}", probe(&arguments.filename)?);
	Ok(())
}

fn probe(path: &Path) -> Result<String> {
	match path.extension().and_then(|e| e.to_str()) {
		Some("mbtiles") => probe_mbtiles(&MBTilesReader::open_path(path)?),
		Some("meta") => probe_metatile(&MetatileReader::open_path(path)?),
		_ => bail!(TileError::UnsupportedMode(format!(
			"can not probe {path:?}, expected *.mbtiles or *.meta"
		))),
	}
}

fn probe_mbtiles(reader: &MBTilesReader) -> Result<String> {
	let mut out = String::from("metadata:\n");
	for (name, value) in reader.metadata().entries() {
		out += &format!("  {name}: {value}\n");
	}

	out += "bounds:\n";
	for bound in reader.bounds().iter() {
		out += &format!("  {}: {} tiles\n", bound.to_top_down(), bound.count());
	}
	Ok(out)
}

fn probe_metatile(reader: &MetatileReader) -> Result<String> {
	let mut out = format!("metatile: {}\nheader: {}\n", reader.metatile(), reader.header());

	out += &format!("tiles: {}\n", reader.index().len());
	for (slot, entry) in reader.index().iter() {
		out += &format!(
			"  {}/{}: offset {}, size {}\n",
			slot.x, slot.y, entry.offset, entry.size
		);
	}
	Ok(out)
}

//! A small utility for converting photos into a CSV of base64-encoded images
//! and the GPS position from their EXIF metadata.
//!
//! Copyright 2023-5 Seth Pendergrass. See LICENSE.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

mod export;
mod io;
mod prim;
mod select;
mod setup;


#[derive(Parser)]
struct Args {
  /// Images to convert. If omitted, a file picker opens (or, without a
  /// display, paths are read from stdin).
  paths: Vec<PathBuf>,

  /// CSV file to write. Replaced if it exists.
  #[arg(short, long, default_value = export::OUTPUT_FILE)]
  output: PathBuf,

  /// Verbosity level. Max: 2.
  #[arg(short, action = ArgAction::Count)]
  verbose: u8,
}

fn main() {
  let args = Args::parse();
  setup::configure_logging(args.verbose);

  let paths = select::select_files(args.paths);
  if let Err(e) = export::export(&paths, &args.output) {
    log::error!("{}", e);
    std::process::exit(1);
  }
}

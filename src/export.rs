// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Converts a batch of image files into CSV records.

use std::{
  panic::{self, AssertUnwindSafe},
  path::{Path, PathBuf},
};

use crate::{
  io,
  prim::{self, ImageRecord},
};

/// Default output, relative to the working directory.
pub const OUTPUT_FILE: &str = "output_images_data.csv";

/// Converts `paths` and writes the records to `output`. Returns the number of
/// records written, or `None` if there was nothing to convert (in which case
/// no file is written).
pub fn export(paths: &[PathBuf], output: &Path) -> Result<Option<usize>, String> {
  if paths.is_empty() {
    log::info!("No files selected.");
    return Ok(None);
  }

  log::info!("Converting {} file(s).", paths.len());
  let records = build_records(paths);

  io::write_csv(output, &records)?;
  log::info!(
    "Wrote {} of {} file(s) to {}.",
    records.len(),
    paths.len(),
    output.display()
  );

  Ok(Some(records.len()))
}

/// Converts each file in order. Ids count up from 1 over the files that
/// loaded; files that failed are logged and left out.
pub fn build_records(paths: &[PathBuf]) -> Vec<ImageRecord> {
  let mut records = Vec::new();
  let mut next_id = 1;

  for path in paths {
    match panic::catch_unwind(AssertUnwindSafe(|| convert_file(path, next_id))) {
      Ok(Some(record)) => {
        records.push(record);
        next_id += 1;
      }
      Ok(None) => {}
      Err(_) => log::error!("{}: Unexpected failure while converting.", path.display()),
    }
  }

  records
}

/// Builds the record for one file, or `None` if the image can't be loaded.
/// Missing GPS data or an unreadable payload still produce a record.
fn convert_file(path: &Path, id: u32) -> Option<ImageRecord> {
  let image = io::load_image(path)
    .inspect_err(|e| log::error!("{e}"))
    .ok()?;

  let tags = prim::read_exif_tags(&image);
  log::debug!("{}: Read {} EXIF tag(s).", path.display(), tags.len());
  let lon_lat = prim::get_lon_lat(&tags.gps_info());

  let payload = io::read_base64(path)
    .inspect_err(|e| log::error!("{e}"))
    .ok();

  log::debug!("{}: Converted as #{id}.", path.display());
  Some(ImageRecord::new(id, payload.as_deref(), lon_lat))
}

// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Functions for reading images and writing the CSV.

use std::{
  fs::{self, File},
  io::BufReader,
  path::Path,
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::prim::{ImageRecord, LoadedImage};

/// Column names, in order.
pub const CSV_HEADER: [&str; 4] = ["id", "image_base64", "lon", "lat"];

/// Files with this extension (any case) are decoded with libheif.
const HEIC_EXTENSION: &str = "heic";

/// Decodes the image at `path`, keeping its EXIF block for later.
pub fn load_image(path: impl AsRef<Path>) -> Result<LoadedImage, String> {
  let path = path.as_ref();

  if is_heic(path) {
    load_heic(path)
  } else {
    load_generic(path)
  }
}

fn is_heic(path: &Path) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| e.eq_ignore_ascii_case(HEIC_EXTENSION))
}

/// Decodes PNG, JPEG and the other formats the `image` crate supports. The
/// format is guessed from the file contents, falling back to the extension.
fn load_generic(path: &Path) -> Result<LoadedImage, String> {
  let mut decoder = ImageReader::open(path)
    .map_err(|e| format!("{}: Unable to open image ({e}).", path.display()))?
    .with_guessed_format()
    .map_err(|e| format!("{}: Unable to read image header ({e}).", path.display()))?
    .into_decoder()
    .map_err(|e| format!("{}: Unsupported image ({e}).", path.display()))?;

  let exif = decoder
    .exif_metadata()
    .unwrap_or_else(|e| {
      log::debug!("{}: Decoder could not extract EXIF ({e}).", path.display());
      None
    })
    .or_else(|| read_container_exif(path));

  let pixels = DynamicImage::from_decoder(decoder)
    .map_err(|e| format!("{}: Unable to decode image ({e}).", path.display()))?;

  log::debug!(
    "{}: Decoded {}x{} image.",
    path.display(),
    pixels.width(),
    pixels.height()
  );
  Ok(LoadedImage::new(path, pixels, exif))
}

/// Reads the EXIF block straight from the file's container (JPEG, PNG, TIFF,
/// WebP, HEIF), for formats whose decoder doesn't expose it.
fn read_container_exif(path: &Path) -> Option<Vec<u8>> {
  let file = File::open(path).ok()?;
  match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
    Ok(exif) => Some(exif.buf().to_vec()),
    Err(e) => {
      log::debug!("{}: No EXIF in container ({e}).", path.display());
      None
    }
  }
}

/// Decodes HEIC to an interleaved RGB(A) bitmap, and reads its `Exif` item.
#[cfg(feature = "heic")]
fn load_heic(path: &Path) -> Result<LoadedImage, String> {
  use libheif_rs::{ColorSpace, HeifContext, ItemId, LibHeif, RgbChroma};

  use crate::prim::{self, PixelMode};

  let path_str = path
    .to_str()
    .ok_or_else(|| format!("{}: Path is not valid UTF-8.", path.display()))?;

  let ctx = HeifContext::read_from_file(path_str)
    .map_err(|e| format!("{}: Unable to open HEIC ({e}).", path.display()))?;
  let handle = ctx
    .primary_image_handle()
    .map_err(|e| format!("{}: HEIC has no primary image ({e}).", path.display()))?;

  let (mode, chroma) = if handle.has_alpha_channel() {
    (PixelMode::Rgba, RgbChroma::Rgba)
  } else {
    (PixelMode::Rgb, RgbChroma::Rgb)
  };

  let decoded = LibHeif::new()
    .decode(&handle, ColorSpace::Rgb(chroma), None)
    .map_err(|e| format!("{}: Unable to decode HEIC ({e}).", path.display()))?;
  let planes = decoded.planes();
  let plane = planes
    .interleaved
    .ok_or_else(|| format!("{}: Decoded HEIC has no interleaved plane.", path.display()))?;

  let pixels = prim::image_from_raw(mode, plane.width, plane.height, plane.data, plane.stride)
    .map_err(|e| format!("{}: {e}", path.display()))?;

  let mut exif_ids: Vec<ItemId> = vec![0; 1];
  let exif = if handle.metadata_block_ids(&mut exif_ids, b"Exif") > 0 {
    handle
      .metadata(exif_ids[0])
      .ok()
      .and_then(|item| prim::heif_exif_payload(&item))
  } else {
    None
  };

  log::debug!(
    "{}: Decoded {}x{} HEIC image.",
    path.display(),
    pixels.width(),
    pixels.height()
  );
  Ok(LoadedImage::new(path, pixels, exif))
}

#[cfg(not(feature = "heic"))]
fn load_heic(path: &Path) -> Result<LoadedImage, String> {
  Err(format!(
    "{}: HEIC support is not enabled (build with `--features heic`).",
    path.display()
  ))
}

/// Reads the file at `path` and encodes it as standard, padded base64.
pub fn read_base64(path: impl AsRef<Path>) -> Result<String, String> {
  let path = path.as_ref();

  let bytes = fs::read(path)
    .map_err(|e| format!("{}: Unable to read file for base64 ({e}).", path.display()))?;

  Ok(STANDARD.encode(bytes))
}

/// Writes `records` to `path`, replacing any existing file. The header is
/// always written, even with no records.
pub fn write_csv(path: impl AsRef<Path>, records: &[ImageRecord]) -> Result<(), String> {
  let path = path.as_ref();
  let to_err = |e: &dyn std::fmt::Display| format!("{}: Unable to write CSV ({e}).", path.display());

  let mut writer = csv::WriterBuilder::new()
    .has_headers(false)
    .terminator(csv::Terminator::CRLF)
    .from_path(path)
    .map_err(|e| to_err(&e))?;

  writer.write_record(CSV_HEADER).map_err(|e| to_err(&e))?;
  for record in records {
    writer.serialize(record).map_err(|e| to_err(&e))?;
  }

  writer.flush().map_err(|e| to_err(&e))
}

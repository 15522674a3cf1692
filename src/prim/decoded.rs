// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Decoded images and the raw EXIF block captured while decoding them.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage, RgbaImage};

/// Identifier some decoders leave in front of the TIFF header (the JPEG APP1
/// marker payload).
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";

/// An image decoded into memory.
pub struct LoadedImage {
  pub path:   PathBuf,
  pub pixels: DynamicImage,
  /// TIFF-format EXIF block, if the container carried one.
  pub exif:   Option<Vec<u8>>,
}

impl LoadedImage {
  pub fn new(path: impl AsRef<Path>, pixels: DynamicImage, exif: Option<Vec<u8>>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
      pixels,
      exif: exif.map(strip_exif_identifier).filter(|e| !e.is_empty()),
    }
  }
}

fn strip_exif_identifier(mut exif: Vec<u8>) -> Vec<u8> {
  if exif.starts_with(EXIF_IDENTIFIER) {
    exif.drain(..EXIF_IDENTIFIER.len());
  }
  exif
}

/// Layout of each pixel in a raw bitmap.
#[cfg_attr(not(feature = "heic"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
  Rgb,
  Rgba,
}

#[cfg_attr(not(feature = "heic"), allow(dead_code))]
impl PixelMode {
  fn channels(self) -> usize {
    match self {
      PixelMode::Rgb => 3,
      PixelMode::Rgba => 4,
    }
  }
}

/// Builds a `DynamicImage` from a raw 8-bit bitmap whose rows are `stride`
/// bytes apart. Any row padding is dropped.
#[cfg_attr(not(feature = "heic"), allow(dead_code))]
pub fn image_from_raw(
  mode: PixelMode,
  width: u32,
  height: u32,
  data: &[u8],
  stride: usize,
) -> Result<DynamicImage, String> {
  if width == 0 || height == 0 {
    return Err(format!("Bitmap has no pixels ({width}x{height})."));
  }

  let rows = height as usize;
  let row_len = width as usize * mode.channels();
  if stride < row_len {
    return Err(format!(
      "Row stride ({stride}) is shorter than a row ({row_len} bytes)."
    ));
  }

  let required = stride * (rows - 1) + row_len;
  if data.len() < required {
    return Err(format!(
      "Bitmap holds {} bytes, but {width}x{height} needs at least {required}.",
      data.len()
    ));
  }

  let mut packed = Vec::with_capacity(row_len * rows);
  for row in data.chunks(stride).take(rows) {
    packed.extend_from_slice(&row[..row_len]);
  }

  let image = match mode {
    PixelMode::Rgb => RgbImage::from_raw(width, height, packed).map(DynamicImage::ImageRgb8),
    PixelMode::Rgba => RgbaImage::from_raw(width, height, packed).map(DynamicImage::ImageRgba8),
  };
  image.ok_or_else(|| format!("Bitmap does not match its dimensions ({width}x{height})."))
}

/// Extracts the TIFF-format EXIF block from a HEIF `Exif` item, which starts
/// with a 4-byte big-endian offset to the TIFF header.
#[cfg_attr(not(feature = "heic"), allow(dead_code))]
pub fn heif_exif_payload(item: &[u8]) -> Option<Vec<u8>> {
  let offset = u32::from_be_bytes(item.get(..4)?.try_into().ok()?) as usize;
  let payload = item.get(4usize.checked_add(offset)?..)?;
  (!payload.is_empty()).then(|| payload.to_vec())
}

// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Small in-memory images, optionally carrying EXIF GPS tags.

use std::io::Cursor;

use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// EXIF rational triple for whole degrees, minutes and seconds.
pub fn dms(deg: u32, min: u32, sec: u32) -> Value {
  Value::Rational(vec![
    Rational::from((deg, 1)),
    Rational::from((min, 1)),
    Rational::from((sec, 1)),
  ])
}

pub fn ascii(text: &str) -> Value {
  Value::Ascii(vec![text.as_bytes().to_vec()])
}

/// Tags for a camera make plus a full GPS position.
pub fn gps_fields(
  lat: (u32, u32, u32),
  lat_ref: &str,
  lon: (u32, u32, u32),
  lon_ref: &str,
) -> Vec<(Tag, Value)> {
  vec![
    (Tag::Make, ascii("img2csv")),
    (Tag::GPSLatitudeRef, ascii(lat_ref)),
    (Tag::GPSLatitude, dms(lat.0, lat.1, lat.2)),
    (Tag::GPSLongitudeRef, ascii(lon_ref)),
    (Tag::GPSLongitude, dms(lon.0, lon.1, lon.2)),
  ]
}

/// Serializes `tags` into the primary IFD of a TIFF-format EXIF block.
pub fn exif_block(tags: &[(Tag, Value)]) -> Vec<u8> {
  let fields = tags
    .iter()
    .map(|(tag, value)| Field {
      tag:     *tag,
      ifd_num: In::PRIMARY,
      value:   value.clone(),
    })
    .collect::<Vec<_>>();

  let mut writer = exif::experimental::Writer::new();
  for field in &fields {
    writer.push_field(field);
  }

  let mut buf = Cursor::new(Vec::new());
  writer.write(&mut buf, false).unwrap();
  buf.into_inner()
}

fn encode(format: ImageFormat) -> Vec<u8> {
  let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 100, 50])));

  let mut buf = Cursor::new(Vec::new());
  image.write_to(&mut buf, format).unwrap();
  buf.into_inner()
}

pub fn png() -> Vec<u8> {
  encode(ImageFormat::Png)
}

/// Encodes a JPEG, with `exif` (a TIFF-format block) in an APP1 segment.
pub fn jpeg(exif: Option<&[u8]>) -> Vec<u8> {
  let encoded = encode(ImageFormat::Jpeg);
  let Some(exif) = exif else {
    return encoded;
  };

  let mut app1 = vec![0xFF, 0xE1];
  let len = u16::try_from(2 + b"Exif\0\0".len() + exif.len()).unwrap();
  app1.extend(len.to_be_bytes());
  app1.extend(b"Exif\0\0");
  app1.extend(exif);

  // Keep the JFIF APP0 segment, if present, directly after SOI.
  let insert_at = if encoded[2..4] == [0xFF, 0xE0] {
    4 + usize::from(u16::from_be_bytes([encoded[4], encoded[5]]))
  } else {
    2
  };

  [&encoded[..insert_at], &app1[..], &encoded[insert_at..]].concat()
}

/// A JPEG tagged with the given GPS position.
pub fn jpeg_with_gps(
  lat: (u32, u32, u32),
  lat_ref: &str,
  lon: (u32, u32, u32),
  lon_ref: &str,
) -> Vec<u8> {
  jpeg(Some(&exif_block(&gps_fields(lat, lat_ref, lon, lon_ref))))
}

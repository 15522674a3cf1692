// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! One output row per converted image.

use serde::Serialize;

/// Every payload is labelled as JPEG, whatever the source format.
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// A converted image. Field order matches the CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
  pub id:           u32,
  pub image_base64: String,
  pub lon:          Option<f64>,
  pub lat:          Option<f64>,
}

impl ImageRecord {
  /// Builds a record from a base64 `payload` and a `(lon, lat)` pair. A missing
  /// payload leaves only the data-URI prefix.
  pub fn new(id: u32, payload: Option<&str>, (lon, lat): (Option<f64>, Option<f64>)) -> Self {
    Self {
      id,
      image_base64: format!("{DATA_URI_PREFIX}{}", payload.unwrap_or_default()),
      lon,
      lat,
    }
  }
}

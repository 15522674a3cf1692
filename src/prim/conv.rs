// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Conversion of EXIF GPS tags to signed decimal degrees.

use exif::Value;

use super::GpsInfo;

pub const GPS_LATITUDE: &str = "GPSLatitude";
pub const GPS_LATITUDE_REF: &str = "GPSLatitudeRef";
pub const GPS_LONGITUDE: &str = "GPSLongitude";
pub const GPS_LONGITUDE_REF: &str = "GPSLongitudeRef";

/// Converts degrees, minutes and seconds to latitude and longitude.
pub fn dms_to_lat_lon(deg: f64, min: f64, sec: f64) -> f64 {
  deg + (min / 60.0) + (sec / 3600.0)
}

/// Gets `(longitude, latitude)` in signed decimal degrees from `gps_info`.
///
/// Both are `None` unless `GPSLatitude` and `GPSLongitude` are present. Each
/// axis is `None` on its own if its value can't be read as a degrees, minutes,
/// seconds triple. A reference other than exactly `N` (latitude) or `E`
/// (longitude) negates the coordinate, so unexpected references are treated
/// like `S` or `W`.
pub fn get_lon_lat(gps_info: &GpsInfo) -> (Option<f64>, Option<f64>) {
  let (Some(lat), Some(lon)) = (gps_info.get(GPS_LATITUDE), gps_info.get(GPS_LONGITUDE)) else {
    return (None, None);
  };

  let lat = to_degrees(GPS_LATITUDE, lat)
    .map(|d| apply_reference(d, gps_info.get(GPS_LATITUDE_REF), "N"));
  let lon = to_degrees(GPS_LONGITUDE, lon)
    .map(|d| apply_reference(d, gps_info.get(GPS_LONGITUDE_REF), "E"));

  log::debug!("GPS position: lon {lon:?}, lat {lat:?}");
  (lon, lat)
}

/// Converts the first three components of `value` to decimal degrees.
fn to_degrees(tag: &str, value: &Value) -> Option<f64> {
  let (Some(deg), Some(min), Some(sec)) = (
    component_as_f64(value, 0),
    component_as_f64(value, 1),
    component_as_f64(value, 2),
  ) else {
    log::warn!("Unable to convert {tag} to degrees: {value:?}");
    return None;
  };

  Some(dms_to_lat_lon(deg, min, sec))
}

/// Reads component `index` of a numeric EXIF value. Non-numeric values and
/// non-finite results (e.g. a zero denominator) give `None`.
fn component_as_f64(value: &Value, index: usize) -> Option<f64> {
  let component = match value {
    Value::Rational(v) => v.get(index).map(exif::Rational::to_f64),
    Value::SRational(v) => v.get(index).map(exif::SRational::to_f64),
    Value::Byte(_) | Value::Short(_) | Value::Long(_) => value.get_uint(index).map(f64::from),
    Value::SByte(v) => v.get(index).copied().map(f64::from),
    Value::SShort(v) => v.get(index).copied().map(f64::from),
    Value::SLong(v) => v.get(index).copied().map(f64::from),
    Value::Float(v) => v.get(index).copied().map(f64::from),
    Value::Double(v) => v.get(index).copied(),
    _ => None,
  }?;

  component.is_finite().then_some(component)
}

/// Negates `degrees` unless `reference` is absent or exactly `positive`.
fn apply_reference(degrees: f64, reference: Option<&Value>, positive: &str) -> f64 {
  match reference.map(reference_text) {
    Some(text) if text != positive => -degrees,
    _ => degrees,
  }
}

fn reference_text(value: &Value) -> String {
  match value {
    Value::Ascii(v) => v
      .first()
      .map(|s| String::from_utf8_lossy(s).into_owned())
      .unwrap_or_default(),
    other => format!("{other:?}"),
  }
}

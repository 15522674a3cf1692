// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! EXIF metadata handling: resolves tag ids to names and groups GPS tags.

use std::collections::BTreeMap;

use exif::{Context, Field, In, Reader, Tag, Value};

use super::LoadedImage;

/// Key under which GPS tags are grouped.
pub const GPS_INFO: &str = "GPSInfo";

/// GPS tags by name (e.g. `GPSLatitude`), with their raw EXIF values.
pub type GpsInfo = BTreeMap<String, Value>;

/// A tag's value. GPS tags are nested under a single `GPSInfo` group.
#[derive(Debug, Clone)]
pub enum TagValue {
  Value(Value),
  Group(GpsInfo),
}

/// EXIF tags for the primary image, by name.
///
/// Names are from the EXIF tag table (e.g. `Make`, `DateTimeOriginal`). Tags
/// missing from the table are named by their numeric id.
#[derive(Debug, Clone, Default)]
pub struct ExifTags {
  tags: BTreeMap<String, TagValue>,
}

impl ExifTags {
  /// Collects `fields` of the primary image. IFD pointers only describe the
  /// file layout, so they are skipped.
  pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a Field>) -> Self {
    let mut tags = BTreeMap::new();

    for field in fields {
      if field.ifd_num != In::PRIMARY || is_ifd_pointer(field.tag) {
        continue;
      }

      let name = tag_name(field.tag);
      if field.tag.context() == Context::Gps {
        let group = tags
          .entry(GPS_INFO.to_string())
          .or_insert_with(|| TagValue::Group(GpsInfo::new()));
        if let TagValue::Group(gps_info) = group {
          gps_info.insert(name, field.value.clone());
        }
      } else {
        tags.insert(name, TagValue::Value(field.value.clone()));
      }
    }

    Self { tags }
  }

  pub fn get(&self, name: &str) -> Option<&TagValue> {
    self.tags.get(name)
  }

  /// Gets the GPS tags, which is empty if the image has none.
  pub fn gps_info(&self) -> GpsInfo {
    match self.get(GPS_INFO) {
      Some(TagValue::Group(gps_info)) => gps_info.clone(),
      _ => GpsInfo::new(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.tags.is_empty()
  }

  pub fn len(&self) -> usize {
    self.tags.len()
  }
}

fn is_ifd_pointer(tag: Tag) -> bool {
  tag == Tag::ExifIFDPointer || tag == Tag::GPSInfoIFDPointer || tag == Tag::InteropIFDPointer
}

fn tag_name(tag: Tag) -> String {
  if tag.description().is_some() {
    tag.to_string()
  } else {
    tag.number().to_string()
  }
}

/// Reads the EXIF tags of `image`. Missing or unreadable EXIF data yields an
/// empty set of tags.
pub fn read_exif_tags(image: &LoadedImage) -> ExifTags {
  let Some(raw) = image.exif.as_deref() else {
    log::debug!("{}: No EXIF data.", image.path.display());
    return ExifTags::default();
  };

  let mut reader = Reader::new();
  reader.continue_on_error(true);

  let tags = match reader.read_raw(raw.to_vec()) {
    Ok(exif) => ExifTags::from_fields(exif.fields()),
    Err(exif::Error::PartialResult(partial)) => {
      let (exif, errors) = partial.into_inner();
      for e in errors {
        log::warn!("{}: Ignoring malformed EXIF entry ({e}).", image.path.display());
      }
      ExifTags::from_fields(exif.fields())
    }
    Err(e) => {
      log::warn!("{}: Unable to read EXIF data ({e}).", image.path.display());
      return ExifTags::default();
    }
  };

  log::trace!("{}:\n{:#?}", image.path.display(), tags.tags);
  tags
}

// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Primitive types for representing decoded images, their EXIF metadata, and
//! the CSV records produced from them.

mod conv;
mod decoded;
mod metadata;
mod record;

pub use conv::*;
pub use decoded::*;
pub use metadata::*;
pub use record::*;

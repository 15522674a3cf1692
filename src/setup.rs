// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Program setup functions.

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Maps the `-v` count to a log level.
fn level_for_verbosity(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Sets up `env_logger` with the format "LEVEL\tmessage" (e.g. "WARN\tsomething
/// went wrong").
///
/// Log levels:
/// Error: Files that could not be converted, and output failures.
/// Warn: Degraded results (unreadable metadata, bad coordinates, fallbacks).
/// Info: General program flow.
/// Debug: Per-file details.
/// Trace: Raw EXIF tags.
pub fn configure_logging(verbosity: u8) {
  Builder::new()
    .filter_level(level_for_verbosity(verbosity))
    .format(|buf, record| {
      let style = buf.default_level_style(record.level());
      writeln!(
        buf,
        "{style}{}{style:#}\t{}",
        record.level(),
        record.args()
      )
    })
    .init();
}

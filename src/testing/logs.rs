// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Captures log output of the current test's thread.

use std::{cell::RefCell, sync::Once};

use log::{LevelFilter, Log, Metadata, Record};

thread_local! {
  static LINES: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

static INIT: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
  fn enabled(&self, _: &Metadata) -> bool {
    true
  }

  fn log(&self, record: &Record) {
    let line = format!("{}\t{}", record.level(), record.args());
    LINES.with(|lines| lines.borrow_mut().push(line));
  }

  fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Runs `f`, returning its result and the "LEVEL\tmessage" lines it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
  INIT.call_once(|| {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);
  });

  LINES.with(|lines| lines.borrow_mut().clear());
  let result = f();
  (result, LINES.with(RefCell::take))
}

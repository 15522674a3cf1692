// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Choosing input files. The selector is picked by probing what the
//! environment offers: paths on the command line, then the native file
//! picker, then a comma-separated line on stdin.

use std::{
  env,
  ffi::OsString,
  io::{self, BufRead, BufReader, Write},
  path::PathBuf,
};

/// Prompt shown when reading paths from stdin.
const PROMPT: &str = "Image file paths (comma-separated): ";

/// A source of input paths.
pub trait FileSelector {
  /// Short name for log messages.
  fn name(&self) -> &'static str;

  /// Returns the chosen paths, in order. An empty list means nothing was
  /// chosen, whereas `Err` means this selector could not be used.
  fn select(&mut self) -> Result<Vec<PathBuf>, String>;
}

/// Paths given on the command line.
pub struct ArgSelector {
  paths: Vec<PathBuf>,
}

impl ArgSelector {
  pub fn new(paths: Vec<PathBuf>) -> Self {
    Self { paths }
  }
}

impl FileSelector for ArgSelector {
  fn name(&self) -> &'static str {
    "command line"
  }

  fn select(&mut self) -> Result<Vec<PathBuf>, String> {
    Ok(std::mem::take(&mut self.paths))
  }
}

/// Name filters offered by the file picker, in order.
const PICKER_FILTERS: [(&str, &[&str]); 3] = [
  ("PNG files", &["png"]),
  ("JPEG files", &["jpg", "jpeg"]),
  ("All files", &["*"]),
];

/// The platform's native multi-file picker.
pub struct DialogSelector;

impl DialogSelector {
  /// Gets the picker if there is a desktop session to show it in.
  pub fn detect() -> Option<Self> {
    if cfg!(any(target_os = "windows", target_os = "macos"))
      || has_display(env::var_os("DISPLAY"), env::var_os("WAYLAND_DISPLAY"))
    {
      Some(Self)
    } else {
      log::debug!("No display found.");
      None
    }
  }
}

impl FileSelector for DialogSelector {
  fn name(&self) -> &'static str {
    "file picker"
  }

  fn select(&mut self) -> Result<Vec<PathBuf>, String> {
    let mut dialog = rfd::FileDialog::new().set_title("Select images");
    for (name, exts) in PICKER_FILTERS {
      dialog = dialog.add_filter(name, exts);
    }

    Ok(dialog.pick_files().unwrap_or_else(|| {
      log::debug!("File picker closed without a selection.");
      Vec::new()
    }))
  }
}

/// Paths typed as one comma-separated line.
pub struct StdinSelector<R, W> {
  input:  R,
  prompt: W,
}

impl<R: BufRead, W: Write> StdinSelector<R, W> {
  pub fn new(input: R, prompt: W) -> Self {
    Self { input, prompt }
  }
}

impl StdinSelector<BufReader<io::Stdin>, io::Stderr> {
  /// Reads from the process's stdin, without holding its lock until read.
  pub fn stdin() -> Self {
    Self::new(BufReader::new(io::stdin()), io::stderr())
  }
}

impl<R: BufRead, W: Write> FileSelector for StdinSelector<R, W> {
  fn name(&self) -> &'static str {
    "stdin"
  }

  fn select(&mut self) -> Result<Vec<PathBuf>, String> {
    write!(self.prompt, "{PROMPT}")
      .and_then(|()| self.prompt.flush())
      .map_err(|e| format!("Unable to show prompt ({e})."))?;

    let mut line = String::new();
    self
      .input
      .read_line(&mut line)
      .map_err(|e| format!("Unable to read paths from stdin ({e})."))?;

    Ok(parse_path_list(&line))
  }
}

/// Picks a selector for the environment: `cli_paths` if any were given, else
/// a file picker if one is available, else stdin.
pub fn probe(cli_paths: Vec<PathBuf>) -> Box<dyn FileSelector> {
  if !cli_paths.is_empty() {
    return Box::new(ArgSelector::new(cli_paths));
  }

  if let Some(dialog) = DialogSelector::detect() {
    return Box::new(dialog);
  }

  Box::new(StdinSelector::stdin())
}

/// Gets the input paths, falling back to stdin if the probed selector fails.
pub fn select_files(cli_paths: Vec<PathBuf>) -> Vec<PathBuf> {
  select_with_fallback(probe(cli_paths).as_mut(), &mut StdinSelector::stdin())
}

fn select_with_fallback(
  selector: &mut dyn FileSelector,
  fallback: &mut dyn FileSelector,
) -> Vec<PathBuf> {
  log::debug!("Selecting files via {}.", selector.name());

  let selected = selector.select().or_else(|e| {
    log::warn!("{e}");
    log::warn!("Falling back to {}.", fallback.name());
    fallback.select()
  });

  match selected {
    Ok(paths) => {
      for path in &paths {
        log::debug!("Selected {}.", path.display());
      }
      paths
    }
    Err(e) => {
      log::error!("{e}");
      Vec::new()
    }
  }
}

/// Splits a comma-separated line into trimmed, non-empty paths.
fn parse_path_list(line: &str) -> Vec<PathBuf> {
  line
    .split(',')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .map(PathBuf::from)
    .collect()
}

/// Splits picker output into paths, one per line.
fn parse_picker_output(stdout: &str) -> Vec<PathBuf> {
  stdout
    .lines()
    .filter(|l| !l.is_empty())
    .map(PathBuf::from)
    .collect()
}

/// Whether either display variable names a display.
fn has_display(x11: Option<OsString>, wayland: Option<OsString>) -> bool {
  [x11, wayland].iter().flatten().any(|v| !v.is_empty())
}

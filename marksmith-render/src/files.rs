//! File input and output for the render pipeline.
//!
//! Markdown is read with its line endings normalized to `\n`. HTML is written
//! with the platform's native line endings.
use std::{fs, path::Path};

use log::trace;

use crate::error::{RenderError, RenderResult};

#[cfg(windows)]
const NATIVE_LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const NATIVE_LINE_ENDING: &str = "\n";

/// Read a Markdown file, converting `\r\n` and lone `\r` line endings to `\n`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be read or is not UTF-8.
pub fn read_markdown(path: &Path) -> RenderResult<String> {
  let content =
    fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
  trace!("Read {} bytes from {}", content.len(), path.display());
  Ok(normalize_line_endings(&content))
}

/// Write rendered HTML to `path` using native line endings.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the file cannot be created or written.
pub fn write_html(path: &Path, html: &str) -> RenderResult<()> {
  let native = to_native_line_endings(html);
  fs::write(path, native.as_bytes()).map_err(|e| RenderError::io(path, e))?;
  trace!("Wrote {} bytes to {}", native.len(), path.display());
  Ok(())
}

fn normalize_line_endings(text: &str) -> String {
  if text.contains('\r') {
    text.replace("\r\n", "\n").replace('\r', "\n")
  } else {
    text.to_string()
  }
}

fn to_native_line_endings(text: &str) -> String {
  if NATIVE_LINE_ENDING == "\n" {
    text.to_string()
  } else {
    text.replace('\n', NATIVE_LINE_ENDING)
  }
}

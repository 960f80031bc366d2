//! Error types for rendering operations.
use std::{io, panic::Location, path::PathBuf};

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering a document.
///
/// Malformed Markdown is never an error: the engine accepts arbitrary UTF-8
/// and always produces some HTML. Only resource and I/O failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  /// A buffer or parser instance could not be allocated, or a buffer would
  /// have grown past its configured limit.
  #[error("Not enough memory to allocate {requested} bytes (at {location})")]
  Allocation {
    requested: usize,
    location:  &'static Location<'static>,
  },

  /// Reading the Markdown source or writing the HTML output failed.
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

impl RenderError {
  /// Build an allocation error tagged with the caller's source location.
  #[must_use]
  #[track_caller]
  pub fn allocation(requested: usize) -> Self {
    Self::Allocation {
      requested,
      location: Location::caller(),
    }
  }

  /// Wrap an I/O error with the path it happened on.
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  /// Whether this is an out-of-memory class error.
  #[must_use]
  pub const fn is_allocation(&self) -> bool {
    matches!(self, Self::Allocation { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  #[allow(clippy::panic)]
  fn test_allocation_error_records_caller() {
    match RenderError::allocation(64) {
      RenderError::Allocation {
        requested,
        location,
      } => {
        assert_eq!(requested, 64);
        assert!(location.file().ends_with("error.rs"));
      },
      RenderError::Io { .. } => panic!("expected an allocation error"),
    }
  }

  #[test]
  fn test_io_error_message_names_path() {
    let err = RenderError::io(
      "missing.md",
      io::Error::new(io::ErrorKind::NotFound, "no such file"),
    );
    assert!(!err.is_allocation());
    let message = err.to_string();
    assert!(message.contains("missing.md"));
    assert!(message.contains("no such file"));
  }
}

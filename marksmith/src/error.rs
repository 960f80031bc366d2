use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for marksmith configuration files.
#[derive(Debug, Error)]
pub enum CliError {
  #[error("I/O error on config file {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse TOML config from {}: {source}", path.display())]
  Toml {
    path:   PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl CliError {
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

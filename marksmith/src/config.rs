use std::{
  fs,
  path::{Path, PathBuf},
};

use marksmith_render::{ExtensionSet, HtmlRenderer, RenderOptions};
use serde::Deserialize;

use crate::{cli::RenderFlags, error::CliError};

/// Default configuration template. Every toggle is listed with its default so
/// the user can flip what they need.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# marksmith configuration file

# Fail when a render buffer would grow past this many bytes.
# buffer_limit = 16777216

[extensions]
# Do not parse emphasis inside words, e.g. snake*case*name
no_intra_emphasis = false
# Pipe tables
tables = false
# Fenced code blocks
fenced_code = false
# Turn bare URLs into links
autolink = false
# ~~strikethrough~~
strikethrough = false
# Allow block elements without surrounding blank lines
lax_spacing = false
# Require a space after '#' in headings
space_headers = false
# ^superscript^
superscript = false
# Pass $$...$$ and $...$ math through untouched
ignore_math = false

[html]
# Prepend a table of contents
toc = false
# Typographic quotes, dashes and ellipses
smartypants = false
# XHTML-style void elements such as <br />
use_xhtml = false
# Turn every newline inside a paragraph into <br>
hard_wrap = false
# Only keep links with http, https, ftp, mailto or relative URLs
safelink = false
# Drop raw HTML
skip_html = false
# Drop raw <style> tags
skip_style = false
# Drop images
skip_images = false
# Replace links with their text
skip_links = false
# Escape raw HTML instead of passing it through
escape = false
"#;

/// Configuration for a render run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Markdown dialect toggles
  pub extensions: ExtensionSet,

  /// HTML output toggles
  pub html: RenderOptions,

  /// Upper bound for any single render buffer, in bytes
  pub buffer_limit: Option<usize>,
}

impl Config {
  /// Load configuration from a TOML file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid TOML.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;

    toml::from_str(&content).map_err(|source| {
      CliError::Toml {
        path: path.to_path_buf(),
        source,
      }
    })
  }

  /// Load the configuration from `config_file`, or from a discovered config
  /// file when none is given. Falls back to defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file exists but cannot be loaded.
  pub fn load(config_file: Option<&Path>) -> Result<Self, CliError> {
    if let Some(path) = config_file {
      return Self::from_file(path);
    }

    match Self::find_config_file() {
      Some(discovered) => {
        log::info!("Using discovered config file: {}", discovered.display());
        Self::from_file(&discovered)
      },
      None => {
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
      },
    }
  }

  /// Search the usual locations for a configuration file.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let config_filenames =
      ["marksmith.toml", ".marksmith.toml", ".config/marksmith.toml"];

    let current_dir = std::env::current_dir().ok()?;
    for filename in &config_filenames {
      let config_path = current_dir.join(filename);
      if config_path.exists() {
        return Some(config_path);
      }
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
      let config_path = PathBuf::from(xdg_config_home).join("marksmith.toml");
      if config_path.exists() {
        return Some(config_path);
      }
    }

    None
  }

  /// Apply command line flags. A flag given on the command line turns its
  /// toggle on; absent flags leave the configured value alone.
  pub fn merge_with_cli(&mut self, flags: &RenderFlags) {
    let extensions = &mut self.extensions;
    extensions.no_intra_emphasis |= flags.no_intra_emphasis;
    extensions.tables |= flags.tables;
    extensions.fenced_code |= flags.fenced_code;
    extensions.autolink |= flags.autolink;
    extensions.strikethrough |= flags.strikethrough;
    extensions.lax_spacing |= flags.lax_spacing;
    extensions.space_headers |= flags.space_headers;
    extensions.superscript |= flags.superscript;
    extensions.ignore_math |= flags.math;

    let html = &mut self.html;
    html.toc |= flags.toc;
    html.smartypants |= flags.smartypants;
    html.use_xhtml |= flags.xhtml;
    html.hard_wrap |= flags.hard_wrap;
    html.safelink |= flags.safelink;
    html.skip_html |= flags.skip_html;
    html.skip_style |= flags.skip_style;
    html.skip_images |= flags.skip_images;
    html.skip_links |= flags.skip_links;
    html.escape |= flags.escape;

    if flags.buffer_limit.is_some() {
      self.buffer_limit = flags.buffer_limit;
    }
  }

  /// Build a renderer for this configuration.
  #[must_use]
  pub fn renderer(&self) -> HtmlRenderer {
    HtmlRenderer::new().with_buffer_limit(self.buffer_limit)
  }

  /// Write the default configuration template to `path`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be written.
  pub fn generate_default_config(path: &Path) -> Result<(), CliError> {
    fs::write(path, DEFAULT_TOML_TEMPLATE)
      .map_err(|e| CliError::io(path, e))?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

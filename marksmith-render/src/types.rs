//! Types for the marksmith-render public API.
//!
//! # Examples
//!
//! ```
//! use marksmith_render::{ExtensionSet, RenderOptions};
//!
//! let extensions = ExtensionSet {
//!   tables: true,
//!   ignore_math: true,
//!   ..Default::default()
//! };
//! let options = RenderOptions {
//!   toc: true,
//!   ..Default::default()
//! };
//! assert!(!options.smartypants);
//! assert!(!extensions.autolink);
//! ```
use serde::{Deserialize, Serialize};

/// Markdown dialect toggles.
///
/// Every flag is independent and defaults to off. `ignore_math` is not a
/// parser extension: it enables the math guard around the render passes.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct ExtensionSet {
  /// Do not parse emphasis inside words (`foo*bar*baz`).
  pub no_intra_emphasis: bool,
  /// Parse GFM pipe tables.
  pub tables:            bool,
  /// Parse fenced code blocks.
  pub fenced_code:       bool,
  /// Turn bare URLs into links.
  pub autolink:          bool,
  /// Parse `~~strikethrough~~`.
  pub strikethrough:     bool,
  /// Relax blank-line requirements around HTML blocks.
  pub lax_spacing:       bool,
  /// Require a space between `#` and the heading text.
  pub space_headers:     bool,
  /// Parse `^superscript^`.
  pub superscript:       bool,
  /// Protect `$$...$$` and `$...$` regions from Markdown processing.
  pub ignore_math:       bool,
}

/// Output-shaping toggles for the HTML renderer.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct RenderOptions {
  /// Prefix the document with a table of contents and anchor its headings.
  pub toc:         bool,
  /// Apply smartypants typography to the rendered HTML.
  pub smartypants: bool,
  /// Emit XHTML-style void elements (`<br />`).
  pub use_xhtml:   bool,
  /// Turn every newline inside a paragraph into `<br>`.
  pub hard_wrap:   bool,
  /// Only render links with a known-safe scheme.
  pub safelink:    bool,
  /// Drop raw HTML from the source.
  pub skip_html:   bool,
  /// Drop raw `<style>` blocks from the source.
  pub skip_style:  bool,
  /// Drop images.
  pub skip_images: bool,
  /// Render links as their plain text.
  pub skip_links:  bool,
  /// Escape raw HTML instead of passing it through.
  pub escape:      bool,
}

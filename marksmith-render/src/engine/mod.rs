//! Provides a trait-based boundary to the Markdown parser so the pipeline does
//! not depend on any particular engine.
//! Currently supported engines:
//! - **Comrak** - CommonMark + GFM parser with an arena-allocated AST

mod comrak;

pub use self::comrak::ComrakEngine;
use crate::{
  buffer::RenderBuffer,
  error::RenderResult,
  flags::{ExtensionMask, HtmlFlags},
};

/// Maximum block nesting depth handed to every engine.
pub const MAX_NESTING: usize = 16;

/// What a render pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
  /// The full HTML body.
  Body,
  /// Only a nested list linking to the document's headings.
  Toc,
}

/// Renderer configuration for a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererConfig {
  pub mode:        RenderMode,
  pub flags:       HtmlFlags,
  pub max_nesting: usize,
}

impl RendererConfig {
  /// Configuration for the body pass.
  #[must_use]
  pub const fn body(flags: HtmlFlags) -> Self {
    Self {
      mode: RenderMode::Body,
      flags,
      max_nesting: MAX_NESTING,
    }
  }

  /// Configuration for the table-of-contents pass.
  #[must_use]
  pub const fn toc() -> Self {
    Self {
      mode:        RenderMode::Toc,
      flags:       HtmlFlags::TOC,
      max_nesting: MAX_NESTING,
    }
  }
}

/// Trait for Markdown engines.
///
/// An engine renders one buffer of Markdown into HTML per call. It must not
/// keep parser state between calls: every call builds and drops its own
/// parser instance.
pub trait MarkdownEngine: Send + Sync {
  /// Get the name of this engine
  fn name(&self) -> &'static str;

  /// Render `input` and append the HTML to `output`.
  ///
  /// # Errors
  ///
  /// Returns an allocation error if the parser or `output` cannot be
  /// allocated. Nothing is appended to `output` in that case.
  fn render(
    &self,
    input: &RenderBuffer,
    extensions: ExtensionMask,
    config: &RendererConfig,
    output: &mut RenderBuffer,
  ) -> RenderResult<()>;
}

/// Create the default engine.
#[must_use]
pub fn create_default_engine() -> Box<dyn MarkdownEngine> {
  Box::new(ComrakEngine::new())
}

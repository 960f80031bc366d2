//! Markdown to HTML pipeline.
//!
//! A render runs in a fixed order: math protection, the optional table of
//! contents pass, the body pass, and finally math restoration. Smartypants,
//! when enabled, runs over each pass's HTML before it is appended.
use std::{borrow::Cow, fmt, path::Path};

use log::{debug, trace};

use crate::{
  buffer::{BUFFER_UNIT, RenderBuffer},
  engine::{MarkdownEngine, RendererConfig, create_default_engine},
  error::RenderResult,
  files,
  math::MathGuard,
  types::{ExtensionSet, RenderOptions},
  typography,
};

const TOC_HEADER: &str =
  "<div id=\"toc\">\n<div id=\"toc_header\">Table of Contents</div>\n";
const TOC_FOOTER: &str = "</div>\n\n";

/// Renders Markdown to HTML with a configurable engine.
///
/// A renderer holds no per-document state and can be shared across threads.
pub struct HtmlRenderer {
  engine:       Box<dyn MarkdownEngine>,
  buffer_limit: Option<usize>,
}

impl fmt::Debug for HtmlRenderer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HtmlRenderer")
      .field("engine", &self.engine.name())
      .field("buffer_limit", &self.buffer_limit)
      .finish()
  }
}

impl Default for HtmlRenderer {
  fn default() -> Self {
    Self::new()
  }
}

impl HtmlRenderer {
  /// Create a renderer using the default engine and no buffer limit.
  #[must_use]
  pub fn new() -> Self {
    Self {
      engine:       create_default_engine(),
      buffer_limit: None,
    }
  }

  /// Use a different Markdown engine.
  #[must_use]
  pub fn with_engine(mut self, engine: Box<dyn MarkdownEngine>) -> Self {
    self.engine = engine;
    self
  }

  /// Cap every buffer the pipeline allocates at `limit` bytes.
  ///
  /// A render that would need more fails with an allocation error.
  #[must_use]
  pub const fn with_buffer_limit(mut self, limit: Option<usize>) -> Self {
    self.buffer_limit = limit;
    self
  }

  /// Name of the engine in use.
  #[must_use]
  pub fn engine_name(&self) -> &'static str {
    self.engine.name()
  }

  #[must_use]
  pub const fn buffer_limit(&self) -> Option<usize> {
    self.buffer_limit
  }

  /// Render a Markdown string to HTML.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Allocation`](crate::RenderError::Allocation) if
  /// any buffer or parser cannot be allocated. No partial output is returned.
  pub fn render(
    &self,
    text: &str,
    extensions: &ExtensionSet,
    options: &RenderOptions,
  ) -> RenderResult<String> {
    trace!(
      "Rendering {} bytes with the {} engine",
      text.len(),
      self.engine.name()
    );

    let (source, guard) = if extensions.ignore_math {
      let (protected, guard) = MathGuard::protect(text);
      (Cow::Owned(protected), Some(guard))
    } else {
      (Cow::Borrowed(text), None)
    };

    let input = RenderBuffer::from_text(&source, self.buffer_limit)?;
    let mask = extensions.to_mask();
    let mut output = RenderBuffer::with_capacity(BUFFER_UNIT, self.buffer_limit)?;

    if options.toc {
      let mut toc = RenderBuffer::with_capacity(BUFFER_UNIT, self.buffer_limit)?;
      self
        .engine
        .render(&input, mask, &RendererConfig::toc(), &mut toc)?;
      trace!("Table of contents pass produced {} bytes", toc.len());

      output.put(TOC_HEADER)?;
      append_html(&mut output, toc.as_str(), options.smartypants)?;
      output.put(TOC_FOOTER)?;
    }

    let mut body = RenderBuffer::with_capacity(BUFFER_UNIT, self.buffer_limit)?;
    let config = RendererConfig::body(options.to_html_flags());
    self.engine.render(&input, mask, &config, &mut body)?;
    trace!("Body pass produced {} bytes", body.len());
    append_html(&mut output, body.as_str(), options.smartypants)?;

    let html = output.into_string();
    Ok(match guard {
      Some(guard) => guard.restore(html),
      None => html,
    })
  }

  /// Render a Markdown file to HTML.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Io`](crate::RenderError::Io) if the file cannot
  /// be read, or an allocation error as for [`HtmlRenderer::render`].
  pub fn render_file(
    &self,
    path: &Path,
    extensions: &ExtensionSet,
    options: &RenderOptions,
  ) -> RenderResult<String> {
    let text = files::read_markdown(path)?;
    self.render(&text, extensions, options)
  }

  /// Render a Markdown file and write the HTML to `html_path`.
  ///
  /// The output file is only created once rendering has succeeded.
  ///
  /// # Errors
  ///
  /// Returns an I/O error if either file cannot be accessed, or an
  /// allocation error as for [`HtmlRenderer::render`].
  pub fn render_file_to_file(
    &self,
    path: &Path,
    extensions: &ExtensionSet,
    options: &RenderOptions,
    html_path: &Path,
  ) -> RenderResult<()> {
    let html = self.render_file(path, extensions, options)?;
    files::write_html(html_path, &html)?;
    debug!("Rendered {} to {}", path.display(), html_path.display());
    Ok(())
  }
}

fn append_html(
  output: &mut RenderBuffer,
  html: &str,
  smartypants: bool,
) -> RenderResult<()> {
  if smartypants {
    typography::smartypants_into(output, html)
  } else {
    output.put(html)
  }
}

/// Render a Markdown string to HTML with the default engine.
///
/// # Errors
///
/// See [`HtmlRenderer::render`].
pub fn markdown_to_html(
  text: &str,
  extensions: &ExtensionSet,
  options: &RenderOptions,
) -> RenderResult<String> {
  HtmlRenderer::new().render(text, extensions, options)
}

/// Render a Markdown file to an HTML string with the default engine.
///
/// # Errors
///
/// See [`HtmlRenderer::render_file`].
pub fn markdown_file_to_html(
  path: &Path,
  extensions: &ExtensionSet,
  options: &RenderOptions,
) -> RenderResult<String> {
  HtmlRenderer::new().render_file(path, extensions, options)
}

/// Render a Markdown file to an HTML file with the default engine.
///
/// # Errors
///
/// See [`HtmlRenderer::render_file_to_file`].
pub fn markdown_file_to_html_file(
  path: &Path,
  extensions: &ExtensionSet,
  options: &RenderOptions,
  html_path: &Path,
) -> RenderResult<()> {
  HtmlRenderer::new().render_file_to_file(path, extensions, options, html_path)
}

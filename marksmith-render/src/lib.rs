//! # marksmith-render - Markdown to HTML with math and typography
//!
//! Renders Markdown to an HTML fragment, optionally preceded by a table of
//! contents, with TeX-style math kept out of reach of the Markdown parser and
//! smartypants typography applied to the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use marksmith_render::{ExtensionSet, RenderOptions, markdown_to_html};
//!
//! let extensions = ExtensionSet::default();
//! let options = RenderOptions::default();
//! let html = markdown_to_html("# Title\n\nHello", &extensions, &options)?;
//! assert_eq!(html, "<h1>Title</h1>\n<p>Hello</p>\n");
//! # Ok::<(), marksmith_render::RenderError>(())
//! ```
//!
//! ## Features
//!
//! - **Math protection** for `$$...$$` blocks and `$...$` inline spans
//! - **Table of contents** with `toc_N` heading anchors
//! - **Smartypants** quotes, dashes, ellipses and fractions
//! - **Pluggable engines** through the [`MarkdownEngine`] trait
//! - **Observable allocation failure** through an optional buffer limit
//!
//! ## Configuration
//!
//! ```rust
//! use marksmith_render::{ExtensionSet, HtmlRenderer, RenderOptions};
//!
//! let extensions = ExtensionSet {
//!   ignore_math: true,
//!   ..Default::default()
//! };
//! let options = RenderOptions {
//!   toc: true,
//!   smartypants: true,
//!   ..Default::default()
//! };
//!
//! let renderer = HtmlRenderer::new().with_buffer_limit(Some(1 << 20));
//! let html = renderer.render("# Euler\n\n$e^{i\\pi} = -1$", &extensions, &options)?;
//! assert!(html.contains("$e^{i\\pi} = -1$"));
//! # Ok::<(), marksmith_render::RenderError>(())
//! ```

pub mod buffer;
pub mod engine;
pub mod error;
pub mod files;
pub mod flags;
pub mod math;
mod pipeline;
pub mod types;
pub mod typography;
mod utils;

pub use crate::{
  buffer::RenderBuffer,
  engine::{
    ComrakEngine,
    MAX_NESTING,
    MarkdownEngine,
    RenderMode,
    RendererConfig,
  },
  error::{RenderError, RenderResult},
  flags::{ExtensionMask, HtmlFlags},
  math::MathGuard,
  pipeline::{
    HtmlRenderer,
    markdown_file_to_html,
    markdown_file_to_html_file,
    markdown_to_html,
  },
  types::{ExtensionSet, RenderOptions},
};

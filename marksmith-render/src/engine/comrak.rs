//! Comrak-based Markdown engine.
//!
//! Comrak covers CommonMark and the GFM extensions natively. The remaining
//! renderer flags are applied as AST filters before formatting, or as small
//! rewrites of the formatted HTML.
use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, NodeHeading, NodeValue},
  options::Options,
  parse_document,
};
use log::{trace, warn};
use regex::Regex;

use super::{MarkdownEngine, RenderMode, RendererConfig};
use crate::{
  buffer::RenderBuffer,
  error::{RenderError, RenderResult},
  flags::{ExtensionMask, HtmlFlags},
  math,
  utils,
};

/// URL prefixes accepted when `SAFELINK` is set.
const SAFE_LINK_PREFIXES: &[&str] =
  &["http://", "https://", "ftp://", "mailto:", "/", "#"];

/// XHTML-style void elements as comrak emits them.
static XHTML_VOID_RE: LazyLock<Regex> = LazyLock::new(|| {
  utils::compile_static(r"<(br|hr|img|input)(\s[^>]*?)?\s*/>", "XHTML_VOID_RE")
});

/// What a filter does to a single AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeAction {
  Keep,
  Drop,
  Unwrap,
  /// Unwrap and put the delimiter back around the children as text.
  Literal(&'static str),
}

/// Markdown engine backed by comrak.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComrakEngine;

impl ComrakEngine {
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  fn comrak_options(
    extensions: ExtensionMask,
    flags: HtmlFlags,
  ) -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = extensions.contains(ExtensionMask::TABLES);
    options.extension.autolink = extensions.contains(ExtensionMask::AUTOLINK);
    options.extension.strikethrough =
      extensions.contains(ExtensionMask::STRIKETHROUGH);
    options.extension.superscript =
      extensions.contains(ExtensionMask::SUPERSCRIPT);
    options.extension.header_ids = None;
    options.render.hardbreaks = flags.contains(HtmlFlags::HARD_WRAP);
    options.render.escape = flags.contains(HtmlFlags::ESCAPE);
    options.render.r#unsafe = true;
    options
  }
}

impl MarkdownEngine for ComrakEngine {
  fn name(&self) -> &'static str {
    "comrak"
  }

  fn render(
    &self,
    input: &RenderBuffer,
    extensions: ExtensionMask,
    config: &RendererConfig,
    output: &mut RenderBuffer,
  ) -> RenderResult<()> {
    // The rendered document is rarely smaller than its source.
    output.grow(output.len() + input.len())?;

    let arena = Arena::new();
    let options = Self::comrak_options(extensions, config.flags);
    let root = parse_document(&arena, input.as_str(), &options);
    trace!(
      "Parsed {} bytes with comrak (max nesting {})",
      input.len(),
      config.max_nesting
    );

    filter_nodes(&arena, root, extensions, config.flags);

    let html = match config.mode {
      RenderMode::Body if config.flags.contains(HtmlFlags::TOC) => {
        format_anchored(&arena, root, &options)?
      },
      RenderMode::Body => format_node(root, &options)?,
      RenderMode::Toc => toc_outline(&collect_headings(root, &options)?),
    };

    // The TOC pass never sets USE_XHTML, so its links get HTML void tags too.
    if config.flags.contains(HtmlFlags::USE_XHTML) {
      output.put(&html)
    } else {
      output.put(&XHTML_VOID_RE.replace_all(&html, "<$1$2>"))
    }
  }
}

fn format_node<'a>(
  node: &'a AstNode<'a>,
  options: &Options<'_>,
) -> RenderResult<String> {
  let mut html = String::new();
  comrak::format_html(node, options, &mut html)
    .map_err(|_| RenderError::allocation(html.len()))?;
  Ok(html)
}

/// A heading as rendered on its own, e.g. `<h2>Intro</h2>`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderedHeading {
  level: u8,
  html:  String,
}

impl RenderedHeading {
  /// The markup between the opening and closing tags.
  fn inner(&self) -> &str {
    let open = format!("<h{}>", self.level);
    let close = format!("</h{}>", self.level);
    self
      .html
      .strip_prefix(open.as_str())
      .and_then(|rest| rest.strip_suffix(close.as_str()))
      .unwrap_or(&self.html)
  }
}

fn collect_headings<'a>(
  root: &'a AstNode<'a>,
  options: &Options<'_>,
) -> RenderResult<Vec<RenderedHeading>> {
  let mut headings = Vec::new();
  for node in root.descendants() {
    let level = match &node.data.borrow().value {
      NodeValue::Heading(NodeHeading { level, .. }) => *level,
      _ => continue,
    };
    let html = format_node(node, options)?;
    headings.push(RenderedHeading {
      level,
      html: html.trim_end().to_string(),
    });
  }
  Ok(headings)
}

/// Format the document with an `id="toc_N"` attribute on every heading.
///
/// Each heading gets a random marker as its first child. The marker is then
/// swapped for the attribute in the formatted HTML, so raw HTML that repeats a
/// heading's markup never takes its anchor.
fn format_anchored<'a>(
  arena: &'a Arena<'a>,
  root: &'a AstNode<'a>,
  options: &Options<'_>,
) -> RenderResult<String> {
  let headings: Vec<_> = root
    .descendants()
    .filter_map(|node| {
      match &node.data.borrow().value {
        NodeValue::Heading(NodeHeading { level, .. }) => Some((node, *level)),
        _ => None,
      }
    })
    .collect();

  let mut markers = Vec::with_capacity(headings.len());
  for (node, level) in headings {
    let marker = math::generate_token();
    node.prepend(arena.alloc(NodeValue::Text(marker.clone().into()).into()));
    markers.push((level, format!("<h{level}>{marker}")));
  }

  let html = format_node(root, options)?;
  let mut out = String::with_capacity(html.len());
  let mut cursor = 0;
  for (n, (level, marker)) in markers.iter().enumerate() {
    let Some(offset) = html[cursor..].find(marker.as_str()) else {
      trace!("Heading {n} not found in rendered output");
      continue;
    };
    let start = cursor + offset;
    out.push_str(&html[cursor..start]);
    out.push_str(&format!("<h{level} id=\"toc_{n}\">"));
    cursor = start + marker.len();
  }
  out.push_str(&html[cursor..]);
  Ok(out)
}

/// Nested list of links to every heading.
///
/// Levels are taken relative to the first heading, so a document starting at
/// `##` still opens a single list.
fn toc_outline(headings: &[RenderedHeading]) -> String {
  let mut out = String::new();
  let mut current = 0u8;
  let mut offset = 0u8;

  for (n, heading) in headings.iter().enumerate() {
    if current == 0 {
      offset = heading.level.saturating_sub(1);
    }
    let level = heading.level.saturating_sub(offset).max(1);

    if level > current {
      while level > current {
        out.push_str("<ul>\n<li>\n");
        current += 1;
      }
    } else if level < current {
      out.push_str("</li>\n");
      while level < current {
        out.push_str("</ul>\n</li>\n");
        current -= 1;
      }
      out.push_str("<li>\n");
    } else {
      out.push_str("</li>\n<li>\n");
    }

    out.push_str(&format!("<a href=\"#toc_{n}\">{}</a>\n", heading.inner()));
  }

  while current > 0 {
    out.push_str("</li>\n</ul>\n");
    current -= 1;
  }
  out
}

/// Apply the extension and renderer flags comrak has no option for.
fn filter_nodes<'a>(
  arena: &'a Arena<'a>,
  root: &'a AstNode<'a>,
  extensions: ExtensionMask,
  flags: HtmlFlags,
) {
  let no_intra_emphasis = extensions.contains(ExtensionMask::NO_INTRA_EMPHASIS);
  let nodes: Vec<_> = root.descendants().collect();

  for node in nodes {
    let action = match &node.data.borrow().value {
      NodeValue::HtmlBlock(block) => raw_html_action(&block.literal, flags),
      NodeValue::HtmlInline(html) => raw_html_action(html, flags),
      NodeValue::Image(..) if flags.contains(HtmlFlags::SKIP_IMAGES) => {
        NodeAction::Drop
      },
      NodeValue::Link(link) => {
        if flags.contains(HtmlFlags::SKIP_LINKS) {
          NodeAction::Unwrap
        } else if flags.contains(HtmlFlags::SAFELINK) && !is_safe_link(&link.url)
        {
          warn!("Dropping unsafe link to {:?}", link.url);
          NodeAction::Unwrap
        } else {
          NodeAction::Keep
        }
      },
      NodeValue::Emph if no_intra_emphasis && is_intraword(node) => {
        NodeAction::Literal("*")
      },
      NodeValue::Strong if no_intra_emphasis && is_intraword(node) => {
        NodeAction::Literal("**")
      },
      _ => NodeAction::Keep,
    };

    match action {
      NodeAction::Keep => {},
      NodeAction::Drop => node.detach(),
      NodeAction::Unwrap => unwrap_node(node),
      NodeAction::Literal(delimiter) => {
        node.insert_before(arena.alloc(NodeValue::Text(delimiter.into()).into()));
        node.insert_after(arena.alloc(NodeValue::Text(delimiter.into()).into()));
        unwrap_node(node);
      },
    }
  }
}

fn raw_html_action(html: &str, flags: HtmlFlags) -> NodeAction {
  if flags.contains(HtmlFlags::SKIP_HTML) {
    return NodeAction::Drop;
  }
  if flags.contains(HtmlFlags::SKIP_STYLE) {
    let tag = html.trim_start().to_ascii_lowercase();
    if tag.starts_with("<style") || tag.starts_with("</style") {
      return NodeAction::Drop;
    }
  }
  NodeAction::Keep
}

fn is_safe_link(url: &str) -> bool {
  let lower = url.trim().to_ascii_lowercase();
  SAFE_LINK_PREFIXES
    .iter()
    .any(|prefix| lower.starts_with(prefix))
}

/// Whether an emphasis node touches a word character on either side.
fn is_intraword<'a>(node: &'a AstNode<'a>) -> bool {
  adjoins_word(node.previous_sibling(), |t| t.chars().next_back())
    || adjoins_word(node.next_sibling(), |t| t.chars().next())
}

fn adjoins_word<'a>(
  sibling: Option<&'a AstNode<'a>>,
  edge: fn(&str) -> Option<char>,
) -> bool {
  sibling.is_some_and(|node| {
    match &node.data.borrow().value {
      NodeValue::Text(text) => edge(text).is_some_and(char::is_alphanumeric),
      _ => false,
    }
  })
}

/// Replace a node with its children.
fn unwrap_node<'a>(node: &'a AstNode<'a>) {
  let children: Vec<_> = node.children().collect();
  for child in children {
    node.insert_before(child);
  }
  node.detach();
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  fn render_with(
    input: &str,
    extensions: ExtensionMask,
    config: RendererConfig,
  ) -> String {
    let input = RenderBuffer::from_text(input, None).expect("input buffer");
    let mut output =
      RenderBuffer::with_capacity(64, None).expect("output buffer");
    ComrakEngine::new()
      .render(&input, extensions, &config, &mut output)
      .expect("render should succeed");
    output.into_string()
  }

  fn body(input: &str, flags: HtmlFlags) -> String {
    render_with(input, ExtensionMask::EMPTY, RendererConfig::body(flags))
  }

  #[test]
  fn test_plain_paragraph() {
    assert_eq!(
      body("Hello *world*", HtmlFlags::EMPTY),
      "<p>Hello <em>world</em></p>\n"
    );
  }

  #[test]
  fn test_void_elements_follow_xhtml_flag() {
    let input = "a  \nb\n\n---\n";
    let html = body(input, HtmlFlags::EMPTY);
    assert!(html.contains("<br>"), "{html}");
    assert!(html.contains("<hr>"), "{html}");

    let xhtml = body(input, HtmlFlags::USE_XHTML);
    assert!(xhtml.contains("<br />"), "{xhtml}");
    assert!(xhtml.contains("<hr />"), "{xhtml}");
  }

  #[test]
  fn test_hard_wrap() {
    let html = body("one\ntwo", HtmlFlags::HARD_WRAP);
    assert!(html.contains("one<br>"), "{html}");
  }

  #[test]
  fn test_tables_extension() {
    let input = "| a | b |\n|---|---|\n| 1 | 2 |\n";
    let plain = body(input, HtmlFlags::EMPTY);
    assert!(!plain.contains("<table>"));

    let html = render_with(
      input,
      ExtensionMask::TABLES,
      RendererConfig::body(HtmlFlags::EMPTY),
    );
    assert!(html.contains("<table>"), "{html}");
  }

  #[test]
  fn test_gfm_extensions() {
    let cases = [
      (ExtensionMask::AUTOLINK, "see www.example.com", "<a href"),
      (ExtensionMask::STRIKETHROUGH, "~~gone~~", "<del>gone</del>"),
      (ExtensionMask::SUPERSCRIPT, "e^x^", "<sup>x</sup>"),
    ];
    for (extension, input, expected) in cases {
      let plain = body(input, HtmlFlags::EMPTY);
      assert!(!plain.contains(expected), "{plain}");

      let html =
        render_with(input, extension, RendererConfig::body(HtmlFlags::EMPTY));
      assert!(html.contains(expected), "{html}");
    }
  }

  #[test]
  fn test_escape_flag() {
    let html = body("<b>x</b>\n", HtmlFlags::ESCAPE);
    assert!(html.contains("&lt;b&gt;"), "{html}");
    assert!(!html.contains("<b>"), "{html}");

    let html = body("<b>x</b>\n", HtmlFlags::EMPTY);
    assert!(html.contains("<b>x</b>"), "{html}");
  }

  #[test]
  fn test_no_intra_emphasis() {
    let input = "foo*bar*baz and *word*";
    let html = render_with(
      input,
      ExtensionMask::NO_INTRA_EMPHASIS,
      RendererConfig::body(HtmlFlags::EMPTY),
    );
    assert_eq!(html, "<p>foo*bar*baz and <em>word</em></p>\n");

    let html = body(input, HtmlFlags::EMPTY);
    assert!(html.contains("foo<em>bar</em>baz"), "{html}");
  }

  #[test]
  fn test_skip_html_and_style() {
    let input = "<style>p {}</style>\n\n<div>kept</div>\n\ntext <b>bold</b>\n";
    let html = body(input, HtmlFlags::SKIP_STYLE);
    assert!(!html.contains("<style>"), "{html}");
    assert!(html.contains("<div>kept</div>"), "{html}");

    let html = body(input, HtmlFlags::SKIP_HTML);
    assert!(!html.contains("<div>"), "{html}");
    assert!(!html.contains("<b>"), "{html}");
    assert!(html.contains("bold"), "{html}");
  }

  #[test]
  fn test_skip_images_and_links() {
    let input = "![alt](a.png) [text](https://example.com)";
    let html = body(input, HtmlFlags::SKIP_IMAGES);
    assert!(!html.contains("<img"), "{html}");
    assert!(html.contains("<a href"), "{html}");

    let html = body(input, HtmlFlags::SKIP_LINKS);
    assert!(html.contains("<img"), "{html}");
    assert!(!html.contains("<a "), "{html}");
    assert!(html.contains("text"), "{html}");
  }

  #[test]
  fn test_safelink() {
    let input = "[ok](https://example.com) [bad](javascript:alert(1)) \
                 [local](/docs) [frag](#top)";
    let html = body(input, HtmlFlags::SAFELINK);
    assert!(html.contains("href=\"https://example.com\""), "{html}");
    assert!(html.contains("href=\"/docs\""), "{html}");
    assert!(html.contains("href=\"#top\""), "{html}");
    assert!(!html.contains("javascript"), "{html}");
    assert!(html.contains("bad"), "{html}");
  }

  #[test]
  fn test_body_headings_get_toc_anchors() {
    let html = body("# One\n\n## Two\n\n# Three\n", HtmlFlags::TOC);
    assert!(html.contains("<h1 id=\"toc_0\">One</h1>"), "{html}");
    assert!(html.contains("<h2 id=\"toc_1\">Two</h2>"), "{html}");
    assert!(html.contains("<h1 id=\"toc_2\">Three</h1>"), "{html}");

    let html = body("# One\n", HtmlFlags::EMPTY);
    assert_eq!(html, "<h1>One</h1>\n");
  }

  #[test]
  fn test_raw_heading_markup_does_not_take_anchor() {
    let html = body("<h1>One</h1>\n\n# One\n", HtmlFlags::TOC);
    assert_eq!(html, "<h1>One</h1>\n<h1 id=\"toc_0\">One</h1>\n");
  }

  #[test]
  fn test_toc_anchors_survive_escape() {
    let html = body("# A <b>b</b>\n", HtmlFlags::TOC | HtmlFlags::ESCAPE);
    assert!(html.starts_with("<h1 id=\"toc_0\">A &lt;b&gt;"), "{html}");
  }

  #[test]
  fn test_toc_outline_uses_html_void_tags() {
    let toc = render_with(
      "# Logo ![x](a.png)\n",
      ExtensionMask::EMPTY,
      RendererConfig::toc(),
    );
    assert!(toc.contains("<img src=\"a.png\" alt=\"x\">"), "{toc}");
    assert!(!toc.contains("/>"), "{toc}");
  }

  #[test]
  fn test_toc_outline_nesting() {
    let toc = render_with(
      "# A\n\n## B\n\n## C\n\n# D\n",
      ExtensionMask::EMPTY,
      RendererConfig::toc(),
    );
    assert_eq!(
      toc,
      "<ul>\n<li>\n<a href=\"#toc_0\">A</a>\n<ul>\n<li>\n<a \
       href=\"#toc_1\">B</a>\n</li>\n<li>\n<a \
       href=\"#toc_2\">C</a>\n</li>\n</ul>\n</li>\n<li>\n<a \
       href=\"#toc_3\">D</a>\n</li>\n</ul>\n"
    );
  }

  #[test]
  fn test_toc_relative_to_first_heading() {
    let toc = render_with(
      "## Deep\n\n### Deeper\n",
      ExtensionMask::EMPTY,
      RendererConfig::toc(),
    );
    assert!(toc.starts_with("<ul>\n<li>\n<a href=\"#toc_0\">Deep</a>\n<ul>"));
    assert_eq!(toc.matches("<ul>").count(), 2);
    assert_eq!(toc.matches("</ul>").count(), 2);
  }

  #[test]
  fn test_toc_keeps_inline_markup_and_skips_body() {
    let toc = render_with(
      "# The *best*\n\nSome text.\n",
      ExtensionMask::EMPTY,
      RendererConfig::toc(),
    );
    assert!(toc.contains("<a href=\"#toc_0\">The <em>best</em></a>"), "{toc}");
    assert!(!toc.contains("Some text"), "{toc}");
  }

  #[test]
  fn test_toc_without_headings_is_empty() {
    let toc =
      render_with("just text\n", ExtensionMask::EMPTY, RendererConfig::toc());
    assert!(toc.is_empty());
  }

  #[test]
  fn test_output_limit_is_enforced() {
    let input = RenderBuffer::from_text(&"word ".repeat(100), None)
      .expect("input buffer");
    let mut output =
      RenderBuffer::with_capacity(16, Some(64)).expect("output buffer");
    let err = ComrakEngine::new()
      .render(
        &input,
        ExtensionMask::EMPTY,
        &RendererConfig::body(HtmlFlags::EMPTY),
        &mut output,
      )
      .expect_err("output limit is smaller than the input");
    assert!(err.is_allocation());
    assert!(output.is_empty());
  }
}

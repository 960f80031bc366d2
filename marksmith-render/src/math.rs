//! Protection of math regions from Markdown processing.
//!
//! Math like `$a_1 * b_2$` is full of characters Markdown wants to interpret.
//! [`MathGuard::protect`] swaps every math region for an opaque token before
//! rendering, and [`MathGuard::restore`] puts the original text back into the
//! finished HTML.
//!
//! ```
//! use marksmith_render::math::MathGuard;
//!
//! let (protected, guard) = MathGuard::protect("area is $\\pi r^2$ here");
//! assert_eq!(guard.len(), 1);
//! assert!(!protected.contains('$'));
//!
//! let html = format!("<p>{protected}</p>");
//! assert_eq!(guard.restore(html), "<p>area is $\\pi r^2$ here</p>");
//! ```
use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::utils;

/// `$$ ... $$`, greedy across newlines.
static BLOCK_MATH_RE: LazyLock<Regex> =
  LazyLock::new(|| utils::compile_static(r"\$\$[\s\S]+\$\$", "BLOCK_MATH_RE"));

/// `$X...Y$` where `X` and `Y` are not whitespace and nothing spans a line.
static INLINE_MATH_RE: LazyLock<Regex> =
  LazyLock::new(|| utils::compile_static(r"\$\S[^\n]+\S\$", "INLINE_MATH_RE"));

/// Generate a fresh placeholder token.
///
/// Tokens are random 128-bit identifiers in simple hex form, so they contain
/// no Markdown or HTML syntax and do not depend on any shared counter.
#[must_use]
pub fn generate_token() -> String {
  Uuid::new_v4().simple().to_string()
}

/// A protected math region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathBlock {
  pub token:  String,
  pub source: String,
}

/// Table of protected math regions for a single render.
#[derive(Debug, Default)]
pub struct MathGuard {
  blocks: Vec<MathBlock>,
}

impl MathGuard {
  /// Replace every math region in `input` with a placeholder token.
  ///
  /// Block math is substituted first; inline math is then matched against
  /// the result of that first pass.
  #[must_use]
  pub fn protect(input: &str) -> (String, Self) {
    let mut guard = Self::default();
    let after_blocks = guard.substitute(&BLOCK_MATH_RE, input);
    let protected = guard.substitute(&INLINE_MATH_RE, &after_blocks);
    debug!("Protected {} math region(s)", guard.blocks.len());
    (protected, guard)
  }

  fn substitute(&mut self, re: &Regex, text: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
      let token = generate_token();
      self.blocks.push(MathBlock {
        token:  token.clone(),
        source: caps[0].to_string(),
      });
      token
    })
    .into_owned()
  }

  /// Put the original math text back in place of every token in `html`.
  ///
  /// Consumes the guard so restoration happens once. Entries are restored
  /// newest first: an inline region may have swallowed the token of an
  /// earlier block region, which only reappears once the inline one is
  /// restored. Tokens missing from `html` are skipped.
  #[must_use]
  pub fn restore(self, mut html: String) -> String {
    for block in self.blocks.iter().rev() {
      if html.contains(&block.token) {
        html = html.replace(&block.token, &block.source);
      } else {
        debug!(
          "Math region {:?} did not survive rendering and was dropped",
          block.source
        );
      }
    }
    html
  }

  #[must_use]
  pub fn blocks(&self) -> &[MathBlock] {
    &self.blocks
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.blocks.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_block_math_spans_lines() {
    let input = "before\n\n$$\nx^2 + y^2\n$$\n\nafter";
    let (protected, guard) = MathGuard::protect(input);
    assert_eq!(guard.len(), 1);
    assert_eq!(guard.blocks()[0].source, "$$\nx^2 + y^2\n$$");
    assert!(protected.starts_with("before\n\n"));
    assert!(protected.ends_with("\n\nafter"));
  }

  #[test]
  fn test_block_math_is_greedy() {
    let (_, guard) = MathGuard::protect("$$a$$ and $$b$$");
    assert_eq!(guard.len(), 1);
    assert_eq!(guard.blocks()[0].source, "$$a$$ and $$b$$");
  }

  #[test]
  fn test_inline_math_requires_non_space_boundaries() {
    let (protected, guard) = MathGuard::protect("Cost is $5 and $10");
    assert!(guard.is_empty());
    assert_eq!(protected, "Cost is $5 and $10");

    let (_, guard) = MathGuard::protect("a $ spaced $ b");
    assert!(guard.is_empty());
  }

  #[test]
  fn test_inline_math_needs_three_characters() {
    let (_, guard) = MathGuard::protect("$ab$");
    assert!(guard.is_empty());

    let (_, guard) = MathGuard::protect("$abc$");
    assert_eq!(guard.len(), 1);
  }

  #[test]
  fn test_inline_math_does_not_cross_lines() {
    let (_, guard) = MathGuard::protect("$a\nb$");
    assert!(guard.is_empty());
  }

  #[test]
  fn test_tokens_are_unique() {
    let (protected, guard) = MathGuard::protect("$x+1$ then $y+2$\n$z+3$");
    assert_eq!(guard.len(), 2);
    let tokens: Vec<_> = guard.blocks().iter().map(|b| &b.token).collect();
    assert_ne!(tokens[0], tokens[1]);
    assert!(tokens.iter().all(|t| protected.contains(t.as_str())));
  }

  #[test]
  fn test_restore_replaces_every_occurrence() {
    let (protected, guard) = MathGuard::protect("$x^2$");
    let token = guard.blocks()[0].token.clone();
    assert_eq!(protected, token);
    let html = format!("<a title=\"{token}\">{token}</a>");
    assert_eq!(guard.restore(html), "<a title=\"$x^2$\">$x^2$</a>");
  }

  #[test]
  fn test_restore_nested_tokens() {
    // The inline pass sees the block token and swallows it.
    let input = "$a $$b$$ c$";
    let (protected, guard) = MathGuard::protect(input);
    assert_eq!(guard.len(), 2);
    assert_eq!(guard.restore(protected), input);
  }

  #[test]
  fn test_restore_skips_lost_tokens() {
    let (_, guard) = MathGuard::protect("$$lost$$");
    assert_eq!(guard.restore("<p></p>".to_string()), "<p></p>");
  }

  #[test]
  fn test_generate_token_shape() {
    let token = generate_token();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(token, generate_token());
  }
}

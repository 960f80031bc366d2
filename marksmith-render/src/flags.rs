//! Bitmask forms of [`ExtensionSet`] and [`RenderOptions`] handed to a
//! [`MarkdownEngine`](crate::MarkdownEngine).
//!
//! Bit positions follow the Sundown layout so masks stay comparable with
//! tooling that speaks that ABI.
use std::ops::{BitOr, BitOrAssign};

use crate::types::{ExtensionSet, RenderOptions};

/// Parser extension bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtensionMask(u32);

impl ExtensionMask {
  pub const AUTOLINK: Self = Self(1 << 3);
  pub const EMPTY: Self = Self(0);
  pub const FENCED_CODE: Self = Self(1 << 2);
  pub const LAX_SPACING: Self = Self(1 << 8);
  pub const NO_INTRA_EMPHASIS: Self = Self(1 << 0);
  pub const SPACE_HEADERS: Self = Self(1 << 6);
  pub const STRIKETHROUGH: Self = Self(1 << 4);
  pub const SUPERSCRIPT: Self = Self(1 << 7);
  pub const TABLES: Self = Self(1 << 1);

  #[must_use]
  pub const fn bits(self) -> u32 {
    self.0
  }

  #[must_use]
  pub const fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }
}

/// Renderer output-mode bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HtmlFlags(u32);

impl HtmlFlags {
  pub const EMPTY: Self = Self(0);
  pub const ESCAPE: Self = Self(1 << 9);
  pub const HARD_WRAP: Self = Self(1 << 7);
  pub const SAFELINK: Self = Self(1 << 5);
  pub const SKIP_HTML: Self = Self(1 << 0);
  pub const SKIP_IMAGES: Self = Self(1 << 2);
  pub const SKIP_LINKS: Self = Self(1 << 3);
  pub const SKIP_STYLE: Self = Self(1 << 1);
  pub const TOC: Self = Self(1 << 6);
  pub const USE_XHTML: Self = Self(1 << 8);

  #[must_use]
  pub const fn bits(self) -> u32 {
    self.0
  }

  #[must_use]
  pub const fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }
}

macro_rules! impl_bit_ops {
  ($($ty:ty),*) => {
    $(
      impl BitOr for $ty {
        type Output = Self;

        fn bitor(self, rhs: Self) -> Self {
          Self(self.0 | rhs.0)
        }
      }

      impl BitOrAssign for $ty {
        fn bitor_assign(&mut self, rhs: Self) {
          self.0 |= rhs.0;
        }
      }
    )*
  };
}

impl_bit_ops!(ExtensionMask, HtmlFlags);

impl ExtensionSet {
  /// Map the enabled dialect toggles onto the parser bitmask.
  ///
  /// `ignore_math` contributes nothing; it is handled outside the parser.
  #[must_use]
  pub fn to_mask(&self) -> ExtensionMask {
    let mut mask = ExtensionMask::EMPTY;
    if self.no_intra_emphasis {
      mask |= ExtensionMask::NO_INTRA_EMPHASIS;
    }
    if self.tables {
      mask |= ExtensionMask::TABLES;
    }
    if self.fenced_code {
      mask |= ExtensionMask::FENCED_CODE;
    }
    if self.autolink {
      mask |= ExtensionMask::AUTOLINK;
    }
    if self.strikethrough {
      mask |= ExtensionMask::STRIKETHROUGH;
    }
    if self.lax_spacing {
      mask |= ExtensionMask::LAX_SPACING;
    }
    if self.space_headers {
      mask |= ExtensionMask::SPACE_HEADERS;
    }
    if self.superscript {
      mask |= ExtensionMask::SUPERSCRIPT;
    }
    mask
  }
}

impl RenderOptions {
  /// Map the output toggles onto the renderer bitmask.
  ///
  /// `smartypants` contributes nothing; it runs as a separate pass.
  #[must_use]
  pub fn to_html_flags(&self) -> HtmlFlags {
    let mut flags = HtmlFlags::EMPTY;
    if self.use_xhtml {
      flags |= HtmlFlags::USE_XHTML;
    }
    if self.hard_wrap {
      flags |= HtmlFlags::HARD_WRAP;
    }
    if self.toc {
      flags |= HtmlFlags::TOC;
    }
    if self.safelink {
      flags |= HtmlFlags::SAFELINK;
    }
    if self.skip_html {
      flags |= HtmlFlags::SKIP_HTML;
    }
    if self.skip_style {
      flags |= HtmlFlags::SKIP_STYLE;
    }
    if self.skip_images {
      flags |= HtmlFlags::SKIP_IMAGES;
    }
    if self.skip_links {
      flags |= HtmlFlags::SKIP_LINKS;
    }
    if self.escape {
      flags |= HtmlFlags::ESCAPE;
    }
    flags
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_extensions_map_to_empty_mask() {
    assert_eq!(ExtensionSet::default().to_mask(), ExtensionMask::EMPTY);
    assert_eq!(RenderOptions::default().to_html_flags(), HtmlFlags::EMPTY);
  }

  #[test]
  fn test_ignore_math_has_no_parser_bit() {
    let extensions = ExtensionSet {
      ignore_math: true,
      ..Default::default()
    };
    assert_eq!(extensions.to_mask().bits(), 0);
  }

  #[test]
  fn test_smartypants_has_no_renderer_bit() {
    let options = RenderOptions {
      smartypants: true,
      ..Default::default()
    };
    assert_eq!(options.to_html_flags().bits(), 0);
  }

  #[test]
  fn test_each_flag_sets_its_own_bit() {
    let extensions = ExtensionSet {
      tables: true,
      superscript: true,
      ..Default::default()
    };
    let mask = extensions.to_mask();
    assert!(mask.contains(ExtensionMask::TABLES));
    assert!(mask.contains(ExtensionMask::SUPERSCRIPT));
    assert!(!mask.contains(ExtensionMask::AUTOLINK));
    assert_eq!(mask.bits(), (1 << 1) | (1 << 7));

    let options = RenderOptions {
      toc: true,
      escape: true,
      ..Default::default()
    };
    let flags = options.to_html_flags();
    assert!(flags.contains(HtmlFlags::TOC | HtmlFlags::ESCAPE));
    assert!(!flags.contains(HtmlFlags::SAFELINK));
  }
}

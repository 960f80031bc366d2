//! Smartypants typography for rendered HTML.
//!
//! Straight quotes, dashes, ellipses and a handful of symbols are rewritten
//! into their typographic HTML entities. Only text is touched: tags are
//! copied verbatim, and the contents of code-like elements are left alone.
//!
//! ```
//! use marksmith_render::typography::smartypants;
//!
//! assert_eq!(
//!   smartypants("<p>\"Hi\" -- it's me...</p>"),
//!   "<p>&ldquo;Hi&rdquo; &ndash; it&rsquo;s me&hellip;</p>"
//! );
//! ```
use crate::{buffer::RenderBuffer, error::RenderResult};

/// Elements whose contents are never rewritten.
const SKIP_TAGS: &[&str] =
  &["pre", "code", "var", "samp", "kbd", "math", "script", "style"];

/// Longest entity we bother to recognize, `&` and `;` included.
const MAX_ENTITY_LEN: usize = 12;

#[derive(Debug, Default)]
struct QuoteState {
  in_single: bool,
  in_double: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteKind {
  Single,
  Double,
}

enum Action<'a> {
  /// Emit the replacement and skip `len` input bytes.
  Replace(&'a str, usize),
  /// Copy `len` input bytes unchanged.
  Copy(usize),
}

fn is_word_boundary(c: Option<u8>) -> bool {
  c.is_none_or(|c| c.is_ascii_whitespace() || c.is_ascii_punctuation())
}

fn lower_at(bytes: &[u8], i: usize) -> Option<u8> {
  bytes.get(i).map(u8::to_ascii_lowercase)
}

/// Rewrite straight punctuation in `html` into typographic entities.
#[must_use]
pub fn smartypants(html: &str) -> String {
  let bytes = html.as_bytes();
  let mut out = String::with_capacity(html.len() + html.len() / 8);
  let mut state = QuoteState::default();
  let mut flushed = 0;
  let mut i = 0;

  while i < bytes.len() {
    let action = match bytes[i] {
      b'<' => skip_tag(html, i),
      b'&' => entity(html, i, &mut state),
      b'"' => {
        quote(
          bytes.get(i.wrapping_sub(1)).copied(),
          bytes.get(i + 1).copied(),
          QuoteKind::Double,
          &mut state,
        )
        .map(|entity| Action::Replace(entity, 1))
      },
      b'\'' => single_quote(bytes, i, &mut state),
      b'-' => dash(bytes, i),
      b'.' => ellipsis(html, i),
      b'(' => symbol(html, i),
      b'1' | b'3' => fraction(html, i),
      b'`' if bytes.get(i + 1) == Some(&b'`') => {
        quote(
          bytes.get(i.wrapping_sub(1)).copied(),
          bytes.get(i + 2).copied(),
          QuoteKind::Double,
          &mut state,
        )
        .map(|entity| Action::Replace(entity, 2))
      },
      _ => None,
    };

    match action {
      Some(Action::Replace(replacement, len)) => {
        out.push_str(&html[flushed..i]);
        out.push_str(replacement);
        i += len;
        flushed = i;
      },
      Some(Action::Copy(len)) => i += len,
      None => i += 1,
    }
  }

  out.push_str(&html[flushed..]);
  out
}

/// Run [`smartypants`] over `html`, appending the result to `output`.
///
/// # Errors
///
/// Returns an allocation error if `output` cannot grow to fit the result.
pub fn smartypants_into(
  output: &mut RenderBuffer,
  html: &str,
) -> RenderResult<()> {
  output.put(&smartypants(html))
}

/// Decide whether a quote opens or closes, flipping the state if it does
/// either. A quote that neither opens nor closes stays straight.
fn quote(
  previous: Option<u8>,
  next: Option<u8>,
  kind: QuoteKind,
  state: &mut QuoteState,
) -> Option<&'static str> {
  let is_open = match kind {
    QuoteKind::Single => &mut state.in_single,
    QuoteKind::Double => &mut state.in_double,
  };

  if *is_open && !is_word_boundary(next) {
    return None;
  }
  if !*is_open && !is_word_boundary(previous) {
    return None;
  }

  let entity = match (kind, *is_open) {
    (QuoteKind::Single, true) => "&rsquo;",
    (QuoteKind::Single, false) => "&lsquo;",
    (QuoteKind::Double, true) => "&rdquo;",
    (QuoteKind::Double, false) => "&ldquo;",
  };
  *is_open = !*is_open;
  Some(entity)
}

fn single_quote<'a>(
  bytes: &[u8],
  i: usize,
  state: &mut QuoteState,
) -> Option<Action<'a>> {
  let previous = bytes.get(i.wrapping_sub(1)).copied();

  // '' acts as a double quote
  if bytes.get(i + 1) == Some(&b'\'') {
    if let Some(entity) = quote(
      previous,
      bytes.get(i + 2).copied(),
      QuoteKind::Double,
      state,
    ) {
      return Some(Action::Replace(entity, 2));
    }
  }

  // Contractions: it's, don't, I'm, he'd, they're, we'll, I've
  let t1 = lower_at(bytes, i + 1);
  let t2 = lower_at(bytes, i + 2);
  if matches!(t1, Some(b's' | b't' | b'm' | b'd'))
    && is_word_boundary(bytes.get(i + 2).copied())
  {
    return Some(Action::Replace("&rsquo;", 1));
  }
  if matches!(
    (t1, t2),
    (Some(b'r'), Some(b'e'))
      | (Some(b'l'), Some(b'l'))
      | (Some(b'v'), Some(b'e'))
  ) && is_word_boundary(bytes.get(i + 3).copied())
  {
    return Some(Action::Replace("&rsquo;", 1));
  }

  quote(previous, bytes.get(i + 1).copied(), QuoteKind::Single, state)
    .map(|entity| Action::Replace(entity, 1))
}

fn dash<'a>(bytes: &[u8], i: usize) -> Option<Action<'a>> {
  match (bytes.get(i + 1), bytes.get(i + 2)) {
    (Some(b'-'), Some(b'-')) => Some(Action::Replace("&mdash;", 3)),
    (Some(b'-'), _) => Some(Action::Replace("&ndash;", 2)),
    _ => None,
  }
}

fn ellipsis(html: &str, i: usize) -> Option<Action<'_>> {
  let rest = &html[i..];
  if rest.starts_with("...") {
    Some(Action::Replace("&hellip;", 3))
  } else if rest.starts_with(". . .") {
    Some(Action::Replace("&hellip;", 5))
  } else {
    None
  }
}

fn symbol(html: &str, i: usize) -> Option<Action<'_>> {
  let bytes = html.as_bytes();
  let rest = &bytes[i..bytes.len().min(i + 4)];
  let starts_with = |pattern: &[u8]| {
    rest.len() >= pattern.len()
      && rest[..pattern.len()].eq_ignore_ascii_case(pattern)
  };

  if starts_with(b"(c)") {
    Some(Action::Replace("&copy;", 3))
  } else if starts_with(b"(r)") {
    Some(Action::Replace("&reg;", 3))
  } else if starts_with(b"(tm)") {
    Some(Action::Replace("&trade;", 4))
  } else {
    None
  }
}

fn fraction(html: &str, i: usize) -> Option<Action<'_>> {
  let bytes = html.as_bytes();
  if !is_word_boundary(bytes.get(i.wrapping_sub(1)).copied()) {
    return None;
  }

  let rest = &html[i..];
  let (entity, allows_ordinal) = if rest.starts_with("1/2") {
    ("&frac12;", false)
  } else if rest.starts_with("1/4") {
    ("&frac14;", true)
  } else if rest.starts_with("3/4") {
    ("&frac34;", true)
  } else {
    return None;
  };

  let after = &rest[3..];
  let suffix_ends =
    |len: usize| is_word_boundary(after.as_bytes().get(len).copied());
  let ordinal_ok = allows_ordinal
    && ((after.starts_with("ths") && suffix_ends(3))
      || (after.starts_with("th") && suffix_ends(2)));

  if is_word_boundary(after.as_bytes().first().copied()) || ordinal_ok {
    Some(Action::Replace(entity, 3))
  } else {
    None
  }
}

/// Entities are copied untouched, apart from `&quot;` which is a double quote
/// in disguise.
fn entity<'a>(
  html: &str,
  i: usize,
  state: &mut QuoteState,
) -> Option<Action<'a>> {
  let bytes = html.as_bytes();
  let rest = &html[i..];

  if rest.starts_with("&quot;") {
    let previous = bytes.get(i.wrapping_sub(1)).copied();
    return quote(
      previous,
      bytes.get(i + 6).copied(),
      QuoteKind::Double,
      state,
    )
    .map(|entity| Action::Replace(entity, 6))
    .or(Some(Action::Copy(6)));
  }

  let end = rest
    .bytes()
    .take(MAX_ENTITY_LEN)
    .skip(1)
    .position(|b| !(b.is_ascii_alphanumeric() || b == b'#'))?;
  (rest.as_bytes().get(end + 1) == Some(&b';') && end > 0)
    .then_some(Action::Copy(end + 2))
}

/// Copy a tag verbatim. Opening a code-like element copies everything up to
/// and including its closing tag.
fn skip_tag<'a>(html: &str, i: usize) -> Option<Action<'a>> {
  let rest = &html[i..];

  if rest.starts_with("<!--") {
    let len = rest.find("-->").map_or(rest.len(), |end| end + 3);
    return Some(Action::Copy(len));
  }

  let tag_len = rest.find('>')? + 1;
  let name: String = rest[1..tag_len]
    .chars()
    .take_while(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_lowercase())
    .collect();

  if !SKIP_TAGS.contains(&name.as_str()) || rest[..tag_len].ends_with("/>") {
    return Some(Action::Copy(tag_len));
  }

  let closing = format!("</{name}");
  let lowered = rest[tag_len..].to_ascii_lowercase();
  let len = lowered.find(&closing).map_or(rest.len(), |start| {
    let close_start = tag_len + start;
    rest[close_start..]
      .find('>')
      .map_or(rest.len(), |end| close_start + end + 1)
  });
  Some(Action::Copy(len))
}

use std::sync::LazyLock;

use regex::Regex;

/// Compile a static pattern, falling back to a regex that never matches if
/// compilation fails.
///
/// The patterns in this crate are literals, so the fallback only guards
/// against a broken build of the regex engine. The failure is logged.
#[must_use]
pub fn compile_static(pattern: &str, name: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// # Panics
///
/// Panics if the pattern `[^\s\S]` fails to compile, which cannot happen with
/// a working regex engine.
#[must_use]
pub fn never_matching_regex() -> Regex {
  static NEVER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
  });
  NEVER.clone()
}

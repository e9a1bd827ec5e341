//! Textual heading extraction.
//!
//! This is a line-oriented pre-pass over the raw source, independent of what
//! the renderer later does with the same text. Headings inside fenced code
//! blocks are *not* excluded: anchor injection searches the rendered markup
//! for the exact text seen here, and a fenced `# heading` simply never finds
//! a matching element. Keeping the scan renderer-agnostic is what guarantees
//! that the two passes agree on heading text.

use std::sync::LazyLock;

use regex::Regex;

use crate::{slug::slugify, types::Heading};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r"^(#{1,6})\s+(.*)$").expect("heading pattern should compile")
});

/// Extract all headings from raw Markdown text, in document order.
///
/// A line is a heading if it starts with 1-6 `#` characters followed by at
/// least one whitespace character; the trimmed remainder is the heading text.
/// Each heading's anchor ID is derived from its text alone, so duplicate
/// headings yield duplicate IDs.
#[must_use]
pub fn extract_headings(content: &str) -> Vec<Heading> {
  let mut headings = Vec::new();

  for line in content.lines() {
    if let Some(caps) = HEADING_RE.captures(line) {
      #[allow(
        clippy::cast_possible_truncation,
        reason = "marker run length is capped at 6 by the pattern"
      )]
      let level = caps[1].len() as u8;
      let text = caps[2].trim().to_string();
      let id = slugify(&text);

      headings.push(Heading { level, text, id });
    }
  }

  headings
}

/// Extract the document title: the text of the first H1, if any.
#[must_use]
pub fn extract_title(headings: &[Heading]) -> Option<String> {
  headings
    .iter()
    .find(|h| h.level == 1)
    .map(|h| h.text.clone())
}

//! Anchor injection into rendered HTML.
//!
//! Binds generated anchor IDs onto heading elements by scanning the markup
//! textually, matching each heading record against `<hN>` elements of the
//! same level whose inner text equals the record's original trimmed text.
//! First match wins and each record consumes at most one element. A record
//! with no match is skipped; its ToC link stays inert within the document.

use std::{collections::HashSet, sync::LazyLock};

use log::debug;
use regex::Regex;

use crate::types::Heading;

static HEADING_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r"(?s)<h([1-6])((?:\s[^>]*)?)>(.*?)</h([1-6])>")
    .expect("heading element pattern should compile")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r"<[^>]*>").expect("tag pattern should compile")
});

/// Add `id` attributes to heading elements for the given heading records.
///
/// Matching compares decoded inner text against the record text, so entity
/// escaping done by the renderer (`Q&amp;A` vs `Q&A`) does not prevent a
/// match. Heading text carrying unrendered inline Markdown (`**bold**`)
/// will not equal the rendered element's text and is skipped, by design.
///
/// Duplicate headings with identical text at the same level bind their
/// anchors to elements in source order; the contract holds as long as the
/// renderer preserves heading order, which comrak does.
#[must_use]
pub fn inject_anchors(html: &str, headings: &[Heading]) -> String {
  // Match starts of elements already bound to a record.
  let mut consumed: HashSet<usize> = HashSet::new();
  // (insertion offset, id attribute) pairs, applied after the scan.
  let mut insertions: Vec<(usize, String)> = Vec::new();

  for heading in headings {
    let wanted = heading.text.trim();
    let mut matched = false;

    for caps in HEADING_ELEMENT_RE.captures_iter(html) {
      #[allow(clippy::expect_used, reason = "group 0 always exists")]
      let whole = caps.get(0).expect("match group");
      if consumed.contains(&whole.start()) {
        continue;
      }
      // Mismatched open/close levels mean we overshot into a later element.
      if caps[1] != caps[4] {
        continue;
      }
      if caps[1] != heading.level.to_string() {
        continue;
      }
      if inner_text(&caps[3]) != wanted {
        continue;
      }

      consumed.insert(whole.start());
      // Insert right after `<hN`, before any existing attributes.
      insertions.push((
        whole.start() + "<h1".len(),
        format!(" id=\"{}\"", heading.id),
      ));
      matched = true;
      break;
    }

    if !matched {
      debug!(
        "no heading element matched '{}' (level {}); anchor '{}' skipped",
        heading.text, heading.level, heading.id
      );
    }
  }

  // Apply back-to-front so earlier offsets stay valid.
  insertions.sort_by(|a, b| b.0.cmp(&a.0));
  let mut out = html.to_string();
  for (offset, attr) in insertions {
    out.insert_str(offset, &attr);
  }
  out
}

/// Visible text of an HTML fragment: tags stripped, entities decoded.
fn inner_text(fragment: &str) -> String {
  let stripped = TAG_RE.replace_all(fragment, "");
  html_escape::decode_html_entities(stripped.as_ref())
    .trim()
    .to_string()
}

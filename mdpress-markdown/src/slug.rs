//! Anchor identifier derivation.

/// Slugify heading text into an anchor ID.
///
/// Lowercases ASCII letters, keeps digits, and collapses every run of other
/// characters into a single hyphen; leading and trailing hyphens are trimmed.
/// Pure and deterministic: the same text always yields the same ID.
///
/// Two headings with identical text produce identical IDs. That collision is
/// accepted behavior; callers that merge multiple documents into one anchor
/// namespace disambiguate by qualifying the text first (see [`qualified_id`]).
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut id = String::with_capacity(text.len());
  let mut pending_hyphen = false;

  for c in text.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_hyphen && !id.is_empty() {
        id.push('-');
      }
      pending_hyphen = false;
      id.push(c.to_ascii_lowercase());
    } else {
      pending_hyphen = true;
    }
  }

  id
}

/// Derive an anchor ID for a heading merged into a multi-document namespace.
///
/// The heading text is qualified with the source document's display name
/// before derivation, so `"Getting Started"` from `guide.md` becomes
/// `getting-started-guide-md` and does not collide with the same heading in
/// another file.
#[must_use]
pub fn qualified_id(text: &str, source_label: &str) -> String {
  slugify(&format!("{text} ({source_label})"))
}

#[cfg(test)]
mod tests {
  use super::{qualified_id, slugify};

  #[test]
  fn lowercases_and_hyphenates() {
    assert_eq!(slugify("Getting Started"), "getting-started");
  }

  #[test]
  fn collapses_symbol_runs() {
    assert_eq!(slugify("Errors --- and panics!"), "errors-and-panics");
    assert_eq!(slugify("a / b / c"), "a-b-c");
  }

  #[test]
  fn trims_leading_and_trailing_hyphens() {
    assert_eq!(slugify("  (notes)  "), "notes");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn is_deterministic() {
    let a = slugify("Install with `nix-env`");
    let b = slugify("Install with `nix-env`");
    assert_eq!(a, b);
  }

  #[test]
  fn qualification_disambiguates_across_files() {
    assert_eq!(
      qualified_id("Getting Started", "guide.md"),
      "getting-started-guide-md"
    );
    assert_ne!(
      qualified_id("Overview", "a.md"),
      qualified_id("Overview", "b.md")
    );
  }
}

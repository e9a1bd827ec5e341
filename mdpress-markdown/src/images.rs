//! Raw image reference extraction.

use std::{path::Path, sync::LazyLock};

use regex::Regex;

use crate::types::ImageRef;

// Matches `![alt](path)` and `![alt](path "title")`; the captured path never
// includes the title attribute.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r#"!\[[^\]]*\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#)
    .expect("image pattern should compile")
});

/// Extract all image references from raw Markdown text, in document order.
///
/// Each reference records the source document path so later resolution can
/// happen relative to that document's directory. References are consumed
/// once per conversion pass and not persisted.
#[must_use]
pub fn extract_image_refs(content: &str, source: &Path) -> Vec<ImageRef> {
  IMAGE_RE
    .captures_iter(content)
    .map(|caps| ImageRef {
      path:   caps[1].to_string(),
      source: source.to_path_buf(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::extract_image_refs;

  #[test]
  fn extracts_path_without_title() {
    let refs = extract_image_refs(
      r#"intro ![logo](./img/logo.png "Our logo") outro"#,
      Path::new("doc.md"),
    );
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].path, "./img/logo.png");
  }

  #[test]
  fn keeps_document_order_and_repeats() {
    let md = "![a](one.png)\ntext\n![b](two.png)\n![c](one.png)\n";
    let refs = extract_image_refs(md, Path::new("doc.md"));
    let paths: Vec<&str> = refs.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, ["one.png", "two.png", "one.png"]);
  }

  #[test]
  fn ignores_plain_links() {
    let refs = extract_image_refs("[not an image](a.png)", Path::new("doc.md"));
    assert!(refs.is_empty());
  }
}

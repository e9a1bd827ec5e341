//! Table-of-contents generation.

use std::fmt::Write;

use mdpress_markdown::Heading;

/// Indentation per heading level, in pixels.
const INDENT_PX: usize = 20;

/// Generate the table of contents for an ordered heading sequence.
///
/// The ToC is one navigational container holding a flatly-indented list:
/// one entry per heading, indented `20 * (level - 1)` pixels, each linking
/// to `#anchorId`. Markdown heading level ordering already encodes the tree,
/// so no nested structure is built.
///
/// Display text strips literal `**` emphasis markers; other inline Markdown
/// syntax is left uninterpreted (known cosmetic limitation).
///
/// When the output is destined for pagination a page-break marker follows
/// the container, so the document body starts on a fresh page.
#[must_use]
pub fn build_toc(headings: &[Heading], paginated: bool) -> String {
  let mut toc = String::new();
  toc.push_str("<nav class=\"toc\">\n");
  toc.push_str("<h2 class=\"toc-title\">Contents</h2>\n");

  for heading in headings {
    let indent = INDENT_PX * usize::from(heading.level.saturating_sub(1));
    let text = heading.text.replace("**", "");
    writeln!(
      toc,
      "<div class=\"toc-entry\" style=\"margin-left: {indent}px\"><a \
       href=\"#{}\">{text}</a></div>",
      heading.id
    )
    .expect("Failed to write to toc string");
  }

  toc.push_str("</nav>\n");
  if paginated {
    toc.push_str("<div class=\"page-break\"></div>\n");
  }

  toc
}

//! Markdown analysis and rendering for mdpress.
//!
//! This crate owns the renderer-independent half of the document assembly
//! pipeline: a textual heading pre-pass with deterministic anchor ID
//! derivation, raw image reference extraction, Markdown→HTML rendering via
//! comrak with a pluggable fenced-code highlighter, and anchor injection
//! into the rendered markup.
//!
//! # Examples
//!
//! ```
//! use mdpress_markdown::{MarkdownRenderer, inject_anchors};
//!
//! let renderer = MarkdownRenderer::default();
//! let result = renderer.render("# Hello\n\nWorld.\n");
//! let html = inject_anchors(&result.html, &result.headings);
//! assert!(html.contains("<h1 id=\"hello\">Hello</h1>"));
//! ```

pub mod anchors;
pub mod headings;
pub mod highlight;
pub mod images;
pub mod renderer;
pub mod slug;
pub mod types;

pub use anchors::inject_anchors;
pub use headings::{extract_headings, extract_title};
pub use highlight::{CodeHighlighter, SyntectHighlighter};
pub use images::extract_image_refs;
pub use renderer::{MarkdownRenderer, RenderOptions};
pub use slug::{qualified_id, slugify};
pub use types::{Heading, ImageRef, RenderResult};

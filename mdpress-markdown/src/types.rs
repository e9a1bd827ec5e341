//! Types for the mdpress-markdown public API.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A heading found in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-6).
  pub level: u8,
  /// Heading text as written in the source, trimmed.
  pub text:  String,
  /// Generated anchor ID for the heading.
  pub id:    String,
}

/// Result of rendering one Markdown source to HTML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResult {
  /// Rendered HTML output.
  pub html: String,

  /// Headings in document order (for ToC and anchor injection).
  pub headings: Vec<Heading>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,
}

/// A raw image reference extracted from Markdown source text.
///
/// `path` is the reference exactly as written, minus any title attribute.
/// Resolution against the filesystem happens later, relative to `source`'s
/// parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
  /// The raw reference from `![alt](path "title")`.
  pub path: String,
  /// Path of the source document the reference was found in.
  pub source: PathBuf,
}

//! Pluggable fenced-code highlighting.
//!
//! The renderer only depends on the [`CodeHighlighter`] trait; the default
//! backend is syntect with its bundled syntax and theme sets. A highlighter
//! returns `None` when it has nothing useful to say about a language, and the
//! renderer falls back to escaped plain text.

use std::sync::OnceLock;

use syntect::{
  easy::HighlightLines,
  highlighting::{Theme, ThemeSet},
  html::{IncludeBackground, append_highlighted_html_for_styled_line},
  parsing::SyntaxSet,
  util::LinesWithEndings,
};

const DEFAULT_THEME: &str = "InspiredGitHub";

/// A fenced-code highlighting backend.
pub trait CodeHighlighter: Send + Sync {
  /// Name of this backend, for logging.
  fn name(&self) -> &'static str;

  /// Highlight `code` written in `language`, returning HTML for the inside
  /// of a `<pre><code>` block, or `None` if the language is not recognized.
  fn highlight(&self, code: &str, language: &str) -> Option<String>;
}

/// Syntect-based highlighter using the bundled defaults.
pub struct SyntectHighlighter {
  theme_name: String,
}

impl SyntectHighlighter {
  /// Create a highlighter with the given theme, falling back to
  /// `InspiredGitHub` when the name is unknown.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name: theme_name.unwrap_or_else(|| DEFAULT_THEME.to_string()),
    }
  }

  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
  }

  fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  fn theme(&self) -> Option<&'static Theme> {
    let themes = &Self::theme_set().themes;
    themes
      .get(&self.theme_name)
      .or_else(|| themes.get(DEFAULT_THEME))
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl CodeHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "syntect"
  }

  fn highlight(&self, code: &str, language: &str) -> Option<String> {
    let syntax = Self::syntax_set().find_syntax_by_token(language)?;
    let theme = self.theme()?;

    let mut lines = HighlightLines::new(syntax, theme);
    let mut out = String::with_capacity(code.len() * 2);

    for line in LinesWithEndings::from(code) {
      let regions = lines.highlight_line(line, Self::syntax_set()).ok()?;
      append_highlighted_html_for_styled_line(
        &regions,
        IncludeBackground::No,
        &mut out,
      )
      .ok()?;
    }

    Some(out)
  }
}

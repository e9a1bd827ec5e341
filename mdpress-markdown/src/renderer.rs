//! Markdown to HTML rendering via comrak.

use std::{borrow::Cow, collections::HashMap, fmt::Write};

use comrak::{
  Options,
  adapters::SyntaxHighlighterAdapter,
  markdown_to_html_with_plugins,
  options::Plugins,
};
use log::debug;

use crate::{
  headings::{extract_headings, extract_title},
  highlight::{CodeHighlighter, SyntectHighlighter},
  types::RenderResult,
};

/// Options for configuring the renderer.
#[derive(Debug, Clone)]
pub struct RenderOptions {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Optional: highlighting theme name.
  pub highlight_theme: Option<String>,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      gfm:             true,
      highlight_code:  true,
      highlight_theme: None,
    }
  }
}

/// Markdown renderer with a pluggable fenced-code highlighter.
pub struct MarkdownRenderer {
  options:     RenderOptions,
  highlighter: Option<Box<dyn CodeHighlighter>>,
}

impl MarkdownRenderer {
  /// Create a renderer with the given options. When highlighting is enabled
  /// the syntect backend is installed by default.
  #[must_use]
  pub fn new(options: RenderOptions) -> Self {
    let highlighter: Option<Box<dyn CodeHighlighter>> =
      if options.highlight_code {
        Some(Box::new(SyntectHighlighter::new(
          options.highlight_theme.clone(),
        )))
      } else {
        None
      };

    Self {
      options,
      highlighter,
    }
  }

  /// Replace the highlighting backend.
  #[must_use]
  pub fn with_highlighter(
    mut self,
    highlighter: Box<dyn CodeHighlighter>,
  ) -> Self {
    self.highlighter = Some(highlighter);
    self
  }

  /// Render Markdown to HTML, extracting headings and title.
  ///
  /// Heading extraction is a textual pre-pass over the raw source (see
  /// [`extract_headings`]); the HTML comes from comrak. Anchor IDs are not
  /// injected here, that is a separate step over the rendered markup.
  #[must_use]
  pub fn render(&self, markdown: &str) -> RenderResult {
    let headings = extract_headings(markdown);
    let title = extract_title(&headings);

    let adapter = HighlightAdapter {
      highlighter: self.highlighter.as_deref(),
    };
    let mut plugins = Plugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);

    let html =
      markdown_to_html_with_plugins(markdown, &self.comrak_options(), &plugins);

    RenderResult {
      html,
      headings,
      title,
    }
  }

  /// Build comrak options from `RenderOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Inline HTML and raw image paths must survive rendering untouched so
    // the anchor injector and image resolver can find them. Comrak's own
    // header id generation stays off (its default); anchor injection owns
    // every id attribute.
    options.render.r#unsafe = true;
    options
  }
}

impl Default for MarkdownRenderer {
  fn default() -> Self {
    Self::new(RenderOptions::default())
  }
}

/// Bridges [`CodeHighlighter`] into comrak's plugin interface, falling back
/// to escaped plain text when the backend has no grammar for the language.
struct HighlightAdapter<'h> {
  highlighter: Option<&'h dyn CodeHighlighter>,
}

impl SyntaxHighlighterAdapter for HighlightAdapter<'_> {
  fn write_highlighted(
    &self,
    output: &mut dyn Write,
    lang: Option<&str>,
    code: &str,
  ) -> std::fmt::Result {
    let lang = lang.unwrap_or("").trim();

    if !lang.is_empty() {
      if let Some(highlighter) = self.highlighter {
        if let Some(html) = highlighter.highlight(code, lang) {
          return output.write_str(&html);
        }
        debug!(
          "{} has no grammar for '{lang}', falling back to plain text",
          highlighter.name()
        );
      }
    }

    output.write_str(&html_escape::encode_text(code))
  }

  fn write_pre_tag(
    &self,
    output: &mut dyn Write,
    attributes: HashMap<&'static str, Cow<'_, str>>,
  ) -> std::fmt::Result {
    write_opening_tag(output, "pre", &attributes)
  }

  fn write_code_tag(
    &self,
    output: &mut dyn Write,
    attributes: HashMap<&'static str, Cow<'_, str>>,
  ) -> std::fmt::Result {
    write_opening_tag(output, "code", &attributes)
  }
}

fn write_opening_tag(
  output: &mut dyn Write,
  tag: &str,
  attributes: &HashMap<&'static str, Cow<'_, str>>,
) -> std::fmt::Result {
  write!(output, "<{tag}")?;
  for (name, value) in attributes {
    write!(
      output,
      " {name}=\"{}\"",
      html_escape::encode_double_quoted_attribute(value)
    )?;
  }
  write!(output, ">")
}

use std::fs;

use color_eyre::eyre::{Context, Result};
use tera::Tera;

use crate::config::Config;

// Embedded fallbacks; a user stylesheet is appended, not substituted.
const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");
const DEFAULT_STYLESHEET: &str = include_str!("../templates/style.css");

/// The final in-memory structure for one output unit: head metadata, styles,
/// ToC markup and body markup with injected anchors and resolved images.
/// Built once per unit and discarded after being written or paginated.
#[derive(Debug)]
pub struct AssembledDocument {
  pub title:  String,
  pub styles: String,
  pub toc:    String,
  pub body:   String,
}

/// Render an assembled document through the page template.
pub fn render(doc: &AssembledDocument) -> Result<String> {
  // The .html name turns on Tera's autoescaping; the markup-bearing values
  // opt out with `| safe` in the template itself.
  let mut tera = Tera::default();
  tera.add_raw_template("default.html", DEFAULT_TEMPLATE)?;

  let mut context = tera::Context::new();
  context.insert("title", &doc.title);
  context.insert("styles", &doc.styles);
  context.insert("toc", &doc.toc);
  context.insert("content", &doc.body);

  Ok(tera.render("default.html", &context)?)
}

/// Build the stylesheet for one output unit: the embedded default, any user
/// stylesheet, and (for paginated output) the `@page` size rule.
pub fn build_styles(config: &Config, paginated: bool) -> Result<String> {
  let mut styles = DEFAULT_STYLESHEET.to_string();

  if let Some(ref path) = config.stylesheet {
    let custom = fs::read_to_string(path).wrap_err_with(|| {
      format!("failed to read stylesheet: {}", path.display())
    })?;
    styles.push('\n');
    styles.push_str(&custom);
  }

  if paginated {
    styles.push_str(&format!(
      "\n@page {{ size: {}; margin: 20mm; }}\n",
      config.paper_size.css_size()
    ));
  }

  Ok(styles)
}

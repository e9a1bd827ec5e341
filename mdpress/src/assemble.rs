//! Document assembly orchestration.
//!
//! Each output unit flows through the same linear pipeline: collect source,
//! extract metadata, render, inject anchors, resolve images, finalize. In
//! per-file mode the pipeline runs once per discovered document; in single
//! (combined) mode all sources are concatenated with file-boundary headings
//! and the pipeline runs once over the merged corpus. Units are processed
//! strictly sequentially because the pagination backend is one shared
//! rendering surface, acquired at the start of the run and reused for every
//! unit.

use std::{
  fs,
  path::{Path, PathBuf},
  time::Duration,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{debug, info};
use mdpress_markdown::{
  Heading,
  ImageRef,
  MarkdownRenderer,
  RenderOptions,
  extract_headings,
  extract_image_refs,
  extract_title,
  inject_anchors,
  qualified_id,
  slugify,
};
use walkdir::WalkDir;

use crate::{
  config::{Config, OutputFormat},
  images::{EmbedMode, ImageResolver},
  pdf::PdfRenderer,
  template::{self, AssembledDocument},
  toc,
};

/// One output unit: either a single source document or the merged corpus.
struct SourceUnit {
  /// Output file stem (`combined`, or the input's basename).
  stem: String,
  /// Page title.
  title: String,
  /// Raw Markdown for the unit.
  markdown: String,
  /// Heading records for ToC and anchor injection, in document order.
  headings: Vec<Heading>,
  /// Raw image references, each tied to its source document.
  images: Vec<ImageRef>,
}

/// Collect all Markdown files under the input directory.
///
/// The walk is depth-first with entries sorted by file name at every level,
/// so discovery (and therefore output) order is deterministic across runs.
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files = Vec::new();

  for entry in WalkDir::new(input_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
  {
    let path = entry.path();
    if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
      files.push(path.to_owned());
    }
  }

  debug!("found {} markdown files", files.len());
  files
}

/// Run the conversion described by `config`.
///
/// A pagination failure halts the remaining queue; outputs already written
/// stay on disk. No operation is retried.
pub fn run(config: &Config) -> Result<()> {
  let files = collect_markdown_files(&config.input_dir);
  if files.is_empty() {
    bail!(
      "no markdown documents found in {}",
      config.input_dir.display()
    );
  }

  fs::create_dir_all(&config.output_dir).wrap_err_with(|| {
    format!(
      "failed to create output directory: {}",
      config.output_dir.display()
    )
  })?;

  let renderer = MarkdownRenderer::new(RenderOptions {
    gfm:             true,
    highlight_code:  config.highlight_code,
    highlight_theme: config.highlight_theme.clone(),
  });

  // The pagination surface is acquired once per run and owned exclusively
  // by this loop.
  let (pdf, mode) = match config.format {
    OutputFormat::Html => (None, EmbedMode::Linked),
    OutputFormat::Pdf => (
      Some(PdfRenderer::new(
        config.browser.as_deref(),
        Duration::from_secs(config.pdf_timeout_secs),
      )?),
      EmbedMode::Embedded,
    ),
  };
  let resolver = ImageResolver::new(&config.remap, &config.output_dir);

  if config.single {
    let unit = collect_combined(config, &files)?;
    assemble_unit(config, &renderer, &resolver, pdf.as_ref(), mode, unit)?;
  } else {
    for file in &files {
      let unit = collect_file(file)?;
      assemble_unit(config, &renderer, &resolver, pdf.as_ref(), mode, unit)?;
    }
  }

  info!("output written to {}", config.output_dir.display());
  Ok(())
}

/// Collect one source document into an output unit.
fn collect_file(path: &Path) -> Result<SourceUnit> {
  let markdown = fs::read_to_string(path).wrap_err_with(|| {
    format!("failed to read markdown file: {}", path.display())
  })?;

  let headings = extract_headings(&markdown);
  let images = extract_image_refs(&markdown, path);
  let stem = path.file_stem().map_or_else(
    || "document".to_string(),
    |stem| stem.to_string_lossy().to_string(),
  );
  let title = extract_title(&headings).unwrap_or_else(|| stem.clone());

  Ok(SourceUnit {
    stem,
    title,
    markdown,
    headings,
    images,
  })
}

/// Collect the whole corpus into one merged output unit.
///
/// Sources are concatenated with a generated `# <display name>` boundary
/// heading between documents. Every heading's anchor ID is re-derived from
/// its text qualified with the source display name, so identical headings in
/// different files cannot collide in the shared namespace. The text kept on
/// the record stays original: ToC display and anchor injection both match
/// against what the renderer actually produced.
fn collect_combined(config: &Config, files: &[PathBuf]) -> Result<SourceUnit> {
  let mut markdown = String::new();
  let mut headings = Vec::new();
  let mut images = Vec::new();

  for file in files {
    let content = fs::read_to_string(file).wrap_err_with(|| {
      format!("failed to read markdown file: {}", file.display())
    })?;
    let display = display_name(&config.input_dir, file);

    if !markdown.is_empty() {
      markdown.push('\n');
    }
    markdown.push_str(&format!("# {display}\n\n"));
    markdown.push_str(&content);
    markdown.push('\n');

    headings.push(Heading {
      level: 1,
      text:  display.clone(),
      id:    slugify(&display),
    });
    for mut heading in extract_headings(&content) {
      heading.id = qualified_id(&heading.text, &display);
      headings.push(heading);
    }
    images.extend(extract_image_refs(&content, file));
  }

  Ok(SourceUnit {
    stem: "combined".to_string(),
    title: config.title.clone(),
    markdown,
    headings,
    images,
  })
}

/// Display name of a source file: its path relative to the input directory,
/// with forward slashes.
fn display_name(input_dir: &Path, file: &Path) -> String {
  file
    .strip_prefix(input_dir)
    .unwrap_or(file)
    .to_string_lossy()
    .replace('\\', "/")
}

/// Run one unit through the assembly pipeline and finalize it.
fn assemble_unit(
  config: &Config,
  renderer: &MarkdownRenderer,
  resolver: &ImageResolver<'_>,
  pdf: Option<&PdfRenderer>,
  mode: EmbedMode,
  unit: SourceUnit,
) -> Result<()> {
  info!("assembling {}", unit.stem);

  let rendered = renderer.render(&unit.markdown);
  let body = inject_anchors(&rendered.html, &unit.headings);
  let body = resolver.resolve(&body, &unit.images, mode)?;

  let doc = AssembledDocument {
    title:  unit.title,
    styles: template::build_styles(config, pdf.is_some())?,
    toc:    toc::build_toc(&unit.headings, pdf.is_some()),
    body,
  };
  let html = template::render(&doc)?;

  match pdf {
    None => {
      let out = config.output_dir.join(format!("{}.html", unit.stem));
      fs::write(&out, html).wrap_err_with(|| {
        format!("failed to write output HTML: {}", out.display())
      })?;
      info!("wrote {}", out.display());
    },
    Some(pagination) => {
      let out = config.output_dir.join(format!("{}.pdf", unit.stem));
      // The browser loads the assembled document by URL from disk; images
      // are already embedded as data URIs at this point.
      let scratch = tempfile::Builder::new()
        .prefix("mdpress-")
        .suffix(".html")
        .tempfile()
        .wrap_err("failed to create scratch file for pagination")?;
      fs::write(scratch.path(), html).wrap_err_with(|| {
        format!("failed to write scratch HTML: {}", scratch.path().display())
      })?;

      pagination.render(scratch.path(), &out).wrap_err_with(|| {
        format!("failed to paginate {}", out.display())
      })?;
      info!("wrote {}", out.display());
    },
  }

  Ok(())
}

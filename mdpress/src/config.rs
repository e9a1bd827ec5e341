use std::{fs, path::PathBuf};

use clap::ValueEnum;
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{cli::Cli, pdf::PaperSize, remap::RemapRules};

fn default_output_dir() -> PathBuf {
  PathBuf::from("output")
}

fn default_title() -> String {
  "Documentation".to_string()
}

const fn default_true() -> bool {
  true
}

const fn default_pdf_timeout() -> u64 {
  30
}

/// Target output format for a run.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// Styled HTML with linked image files.
  #[default]
  Html,
  /// Paginated PDF with embedded images.
  Pdf,
}

/// Configuration for one conversion run.
///
/// Built once at startup from an optional TOML file merged with CLI
/// overrides, then passed around by reference; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  /// Directory containing Markdown input files (CLI only).
  #[serde(skip)]
  pub input_dir: PathBuf,

  /// Output directory for generated documents.
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,

  /// Target output format.
  #[serde(default)]
  pub format: OutputFormat,

  /// Merge all inputs into one document with a shared table of contents.
  #[serde(default)]
  pub single: bool,

  /// Paper size for paginated output.
  #[serde(default)]
  pub paper_size: PaperSize,

  /// Ordered image path remap rules.
  #[serde(default)]
  pub remap: RemapRules,

  /// Title used for combined output and as the fallback page title.
  #[serde(default = "default_title")]
  pub title: String,

  /// Extra stylesheet appended after the built-in one.
  #[serde(default)]
  pub stylesheet: Option<PathBuf>,

  /// Whether to highlight fenced code blocks.
  #[serde(default = "default_true")]
  pub highlight_code: bool,

  /// Highlighting theme name.
  #[serde(default)]
  pub highlight_theme: Option<String>,

  /// Browser binary used as the pagination renderer (overrides discovery).
  #[serde(default)]
  pub browser: Option<PathBuf>,

  /// Bounded wait for the pagination renderer, in seconds.
  #[serde(default = "default_pdf_timeout")]
  pub pdf_timeout_secs: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input_dir:        PathBuf::new(),
      output_dir:       default_output_dir(),
      format:           OutputFormat::default(),
      single:           false,
      paper_size:       PaperSize::default(),
      remap:            RemapRules::default(),
      title:            default_title(),
      stylesheet:       None,
      highlight_code:   true,
      highlight_theme:  None,
      browser:          None,
      pdf_timeout_secs: default_pdf_timeout(),
    }
  }
}

impl Config {
  /// Create configuration from the CLI, merging an optional config file.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut config = match &cli.config_file {
      Some(path) => Self::from_file(path)?,
      None => Self::default(),
    };
    config.merge_with_cli(cli)?;
    Ok(config)
  }

  /// Read configuration from a TOML file.
  fn from_file(path: &std::path::Path) -> Result<Self> {
    let content = fs::read_to_string(path).wrap_err_with(|| {
      format!("failed to read config file: {}", path.display())
    })?;
    toml::from_str(&content).wrap_err_with(|| {
      format!("failed to parse config file: {}", path.display())
    })
  }

  /// Apply CLI values over whatever the file provided.
  fn merge_with_cli(&mut self, cli: &Cli) -> Result<()> {
    self.input_dir.clone_from(&cli.input_dir);

    if let Some(format) = cli.format {
      self.format = format;
    }
    if cli.single {
      self.single = true;
    }
    if let Some(ref output_dir) = cli.output_dir {
      self.output_dir.clone_from(output_dir);
    }
    if let Some(paper_size) = cli.paper_size {
      self.paper_size = paper_size;
    }
    if let Some(ref title) = cli.title {
      self.title.clone_from(title);
    }
    if let Some(ref stylesheet) = cli.stylesheet {
      self.stylesheet = Some(stylesheet.clone());
    }
    if !cli.remap.is_empty() {
      self.remap = RemapRules::parse_pairs(&cli.remap)?;
    }

    Ok(())
  }
}

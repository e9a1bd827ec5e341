use std::path::PathBuf;

use clap::Parser;

use crate::{config::OutputFormat, pdf::PaperSize};

/// Command line interface for mdpress
#[derive(Parser, Debug)]
#[command(author, version, about = "mdpress: Markdown to styled HTML or PDF")]
pub struct Cli {
  /// Directory containing Markdown input files
  pub input_dir: PathBuf,

  /// Output format
  #[arg(short = 'f', long, value_enum)]
  pub format: Option<OutputFormat>,

  /// Merge all inputs into a single output document sharing one table of
  /// contents and anchor namespace
  #[arg(short = 's', long)]
  pub single: bool,

  /// Output directory for generated documents
  #[arg(short = 'o', long)]
  pub output_dir: Option<PathBuf>,

  /// Paper size for paginated (PDF) output
  #[arg(long = "paper-size", value_enum)]
  pub paper_size: Option<PaperSize>,

  /// Image path remap rules as comma-separated `from:to` pairs, applied in
  /// order before filesystem resolution
  #[arg(long = "remap", value_delimiter = ',')]
  pub remap: Vec<String>,

  /// Title for the assembled documentation (used for combined output)
  #[arg(short = 'T', long)]
  pub title: Option<String>,

  /// Path to an extra stylesheet appended after the built-in one
  #[arg(long)]
  pub stylesheet: Option<PathBuf>,

  /// Path to configuration file (TOML); CLI flags override file values
  #[arg(short = 'c', long = "config-file")]
  pub config_file: Option<PathBuf>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

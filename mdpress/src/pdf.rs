//! Pagination rendering via an external headless browser.
//!
//! The pagination backend is a black box: one browser binary, discovered (or
//! configured) once per run, loads the assembled HTML from disk and prints it
//! to PDF. The orchestration loop owns the renderer exclusively and calls it
//! strictly sequentially, one fully-assembled document at a time.

use std::{
  path::{Path, PathBuf},
  process::{Child, Command, Stdio},
  thread,
  time::{Duration, Instant},
};

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Paper size selector for paginated output.
///
/// Applied as an `@page { size: ...; }` rule in the assembled document's
/// stylesheet, which the browser's print pipeline honors.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
  #[default]
  A4,
  Letter,
  Legal,
}

impl PaperSize {
  /// CSS `@page size` keyword for this paper size.
  #[must_use]
  pub const fn css_size(self) -> &'static str {
    match self {
      Self::A4 => "A4",
      Self::Letter => "letter",
      Self::Legal => "legal",
    }
  }
}

/// Errors from the pagination renderer.
#[derive(Debug, Error)]
pub enum PdfError {
  #[error(
    "no usable browser found; install Chromium or Chrome, set `browser` in \
     the config file, or set MDPRESS_BROWSER"
  )]
  BrowserNotFound,

  #[error("pagination renderer did not finish within {0:?} and was killed")]
  Timeout(Duration),

  #[error("pagination renderer exited with {0}")]
  Failed(std::process::ExitStatus),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// The single shared pagination surface for a run.
pub struct PdfRenderer {
  browser: PathBuf,
  timeout: Duration,
}

impl PdfRenderer {
  /// Acquire the rendering surface: use the configured browser binary, or
  /// discover one from `MDPRESS_BROWSER` and well-known names.
  pub fn new(
    browser_override: Option<&Path>,
    timeout: Duration,
  ) -> Result<Self, PdfError> {
    let browser = match browser_override {
      Some(path) => path.to_path_buf(),
      None => discover_browser().ok_or(PdfError::BrowserNotFound)?,
    };
    info!("using pagination renderer: {}", browser.display());

    Ok(Self { browser, timeout })
  }

  /// Render one assembled HTML document at `html_path` into `pdf_path`.
  ///
  /// Waits (bounded) for the browser to report completion; on timeout the
  /// process is killed and only this unit fails. Outputs already written by
  /// earlier units are untouched.
  pub fn render(
    &self,
    html_path: &Path,
    pdf_path: &Path,
  ) -> Result<(), PdfError> {
    let url = format!("file://{}", html_path.display());
    debug!("paginating {url} -> {}", pdf_path.display());

    let mut child = Command::new(&self.browser)
      .arg("--headless")
      .arg("--disable-gpu")
      .arg("--no-pdf-header-footer")
      .arg(format!("--print-to-pdf={}", pdf_path.display()))
      // Let the page's resources finish loading before printing.
      .arg("--virtual-time-budget=10000")
      .arg(&url)
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()?;

    self.wait_bounded(&mut child)
  }

  fn wait_bounded(&self, child: &mut Child) -> Result<(), PdfError> {
    let deadline = Instant::now() + self.timeout;

    loop {
      if let Some(status) = child.try_wait()? {
        if status.success() {
          return Ok(());
        }
        return Err(PdfError::Failed(status));
      }

      if Instant::now() >= deadline {
        // The kill can race with a normal exit; either way the unit failed.
        let _ = child.kill();
        let _ = child.wait();
        return Err(PdfError::Timeout(self.timeout));
      }

      thread::sleep(Duration::from_millis(100));
    }
  }
}

/// Find a browser binary able to print to PDF.
fn discover_browser() -> Option<PathBuf> {
  if let Ok(browser) = std::env::var("MDPRESS_BROWSER") {
    return Some(PathBuf::from(browser));
  }

  const CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome-stable",
    "google-chrome",
    "chrome",
  ];

  CANDIDATES.iter().find_map(|name| {
    Command::new(name)
      .arg("--version")
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .ok()
      .filter(std::process::ExitStatus::success)
      .map(|_| PathBuf::from(name))
  })
}

#[cfg(test)]
mod tests {
  use super::PaperSize;

  #[test]
  fn paper_sizes_map_to_css_keywords() {
    assert_eq!(PaperSize::A4.css_size(), "A4");
    assert_eq!(PaperSize::Letter.css_size(), "letter");
    assert_eq!(PaperSize::Legal.css_size(), "legal");
  }
}

//! Image reference resolution.
//!
//! Raw references extracted from the Markdown source are resolved against
//! the source document's directory after remapping, then either copied into
//! an `images/` subtree of the output directory with the markup rewritten to
//! relative paths (linked mode), or inlined as base64 data URIs (embedded
//! mode). External (network) references pass through unchanged in both
//! modes, and a missing local file degrades to a warning with the original
//! reference left as-is.

use std::{
  collections::{HashMap, VecDeque},
  fs,
  path::{Component, Path, PathBuf},
  sync::LazyLock,
};

use base64::Engine;
use color_eyre::eyre::{Context, Result};
use log::{debug, warn};
use mdpress_markdown::ImageRef;
use regex::Regex;

use crate::remap::{RemapRules, is_external};

static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r"<img\s[^>]*>").expect("img tag pattern should compile")
});

static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(clippy::expect_used, reason = "pattern is statically valid")]
  Regex::new(r#"src="([^"]*)""#).expect("src attribute pattern should compile")
});

/// How resolved image content ends up in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedMode {
  /// Copy files into the output tree and rewrite references to relative
  /// paths.
  Linked,
  /// Inline file bytes as base64 data URIs (self-contained output).
  Embedded,
}

/// Resolves the image references of one output unit against an immutable
/// remap configuration.
pub struct ImageResolver<'a> {
  remap:      &'a RemapRules,
  output_dir: &'a Path,
}

impl<'a> ImageResolver<'a> {
  #[must_use]
  pub const fn new(remap: &'a RemapRules, output_dir: &'a Path) -> Self {
    Self { remap, output_dir }
  }

  /// Resolve every reference and rewrite the rendered markup accordingly.
  pub fn resolve(
    &self,
    html: &str,
    refs: &[ImageRef],
    mode: EmbedMode,
  ) -> Result<String> {
    match mode {
      EmbedMode::Linked => self.resolve_linked(html, refs),
      EmbedMode::Embedded => Ok(self.resolve_embedded(html, refs)),
    }
  }

  /// Linked mode: copy each existing image under `outputDir/images/`,
  /// preserving relative subdirectory structure, and rewrite every literal
  /// occurrence of the original reference to the new relative path.
  fn resolve_linked(&self, html: &str, refs: &[ImageRef]) -> Result<String> {
    let mut out = html.to_string();
    // Same raw path, same rewrite; the literal replacement below already
    // covered every occurrence the first time.
    let mut rewritten: HashMap<&str, String> = HashMap::new();

    for image in refs {
      if is_external(&image.path) || rewritten.contains_key(image.path.as_str())
      {
        continue;
      }

      let Some(resolved) = self.locate(image) else {
        continue;
      };

      let subpath = sanitized_subpath(&self.remap.apply(&image.path));
      let dest = self.output_dir.join("images").join(&subpath);
      if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("failed to create image directory: {}", parent.display())
        })?;
      }
      fs::copy(&resolved, &dest).wrap_err_with(|| {
        format!(
          "failed to copy image {} to {}",
          resolved.display(),
          dest.display()
        )
      })?;

      let new_ref =
        format!("images/{}", subpath.to_string_lossy().replace('\\', "/"));
      debug!("linked {} as {new_ref}", image.path);
      out = out.replace(
        &format!("src=\"{}\"", image.path),
        &format!("src=\"{new_ref}\""),
      );
      rewritten.insert(image.path.as_str(), new_ref);
    }

    Ok(out)
  }

  /// Embedded mode: inline each existing image as a data URI, rewriting the
  /// markup element by element (robust to repeated raw paths).
  ///
  /// Every reference is resolved against its own source document, so in a
  /// merged corpus two documents sharing a raw path (`logo.png` next to each
  /// of them) embed different bytes. The i-th element with a given `src`
  /// consumes the i-th reference with that raw path; `None` entries (external
  /// or unresolvable) leave their element untouched.
  fn resolve_embedded(&self, html: &str, refs: &[ImageRef]) -> String {
    let mut pending: HashMap<&str, VecDeque<Option<String>>> = HashMap::new();

    for image in refs {
      let uri = if is_external(&image.path) {
        None
      } else {
        self
          .locate(image)
          .and_then(|resolved| match data_uri(&resolved) {
            Ok(uri) => Some(uri),
            Err(err) => {
              warn!("failed to embed image {}: {err}", resolved.display());
              None
            },
          })
      };
      pending.entry(image.path.as_str()).or_default().push_back(uri);
    }

    IMG_TAG_RE
      .replace_all(html, |caps: &regex::Captures| {
        let tag = &caps[0];
        let Some(src) = SRC_ATTR_RE.captures(tag) else {
          return tag.to_string();
        };
        // Elements with no backing reference (inline HTML images) pass
        // through unchanged.
        let uri = pending
          .get_mut(&src[1])
          .and_then(VecDeque::pop_front)
          .flatten();
        match uri {
          Some(uri) => tag.replace(
            &format!("src=\"{}\"", &src[1]),
            &format!("src=\"{uri}\""),
          ),
          None => tag.to_string(),
        }
      })
      .to_string()
  }

  /// Remap a local reference and resolve it against the source document's
  /// directory. A missing file logs a warning and returns `None`, leaving
  /// the original reference untouched downstream.
  fn locate(&self, image: &ImageRef) -> Option<PathBuf> {
    let remapped = self.remap.apply(&image.path);
    let source_dir = image.source.parent().unwrap_or_else(|| Path::new("."));
    let resolved = source_dir.join(&remapped);

    if resolved.is_file() {
      Some(resolved)
    } else {
      warn!(
        "image not found: {} (referenced as '{}' in {})",
        resolved.display(),
        image.path,
        image.source.display()
      );
      None
    }
  }
}

/// Read a file and encode it as a `data:` URI with a MIME type derived from
/// its extension.
fn data_uri(path: &Path) -> std::io::Result<String> {
  let bytes = fs::read(path)?;
  let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
  Ok(format!("data:{};base64,{payload}", mime_for(path)))
}

/// MIME type for an image file, by extension.
fn mime_for(path: &Path) -> String {
  let ext = path
    .extension()
    .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    .unwrap_or_default();

  match ext.as_str() {
    "jpg" | "jpeg" => "image/jpeg".to_string(),
    "png" => "image/png".to_string(),
    "gif" => "image/gif".to_string(),
    "svg" => "image/svg+xml".to_string(),
    "webp" => "image/webp".to_string(),
    "" => "application/octet-stream".to_string(),
    other => format!("image/{other}"),
  }
}

/// Normal path components of a (remapped) reference, used as the subtree
/// below `images/`. Strips `.`/`..`/root so the copy stays inside the
/// output directory.
fn sanitized_subpath(reference: &str) -> PathBuf {
  Path::new(reference)
    .components()
    .filter_map(|component| match component {
      Component::Normal(part) => Some(part),
      _ => None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::{Path, PathBuf};

  use super::{mime_for, sanitized_subpath};

  #[test]
  fn mime_mapping_covers_known_and_unknown_extensions() {
    assert_eq!(mime_for(Path::new("a.PNG")), "image/png");
    assert_eq!(mime_for(Path::new("a.jpg")), "image/jpeg");
    assert_eq!(mime_for(Path::new("a.jpeg")), "image/jpeg");
    assert_eq!(mime_for(Path::new("a.svg")), "image/svg+xml");
    assert_eq!(mime_for(Path::new("a.webp")), "image/webp");
    assert_eq!(mime_for(Path::new("a.bmp")), "image/bmp");
    assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
  }

  #[test]
  fn subpath_preserves_structure_but_not_traversal() {
    assert_eq!(
      sanitized_subpath("./img/shots/a.png"),
      PathBuf::from("img/shots/a.png")
    );
    assert_eq!(
      sanitized_subpath("../shared/logo.png"),
      PathBuf::from("shared/logo.png")
    );
    assert_eq!(
      sanitized_subpath("/assets/logo.png"),
      PathBuf::from("assets/logo.png")
    );
  }
}

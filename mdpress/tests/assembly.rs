use std::{fs, path::Path};

use base64::Engine;
use mdpress::{
  assemble,
  config::{Config, OutputFormat},
  images::{EmbedMode, ImageResolver},
  remap::RemapRules,
};
use mdpress_markdown::extract_image_refs;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).expect("Failed to create parent directory");
  }
  fs::write(path, content).expect("Failed to write test file");
}

fn html_config(input_dir: &Path, output_dir: &Path) -> Config {
  Config {
    input_dir: input_dir.to_path_buf(),
    output_dir: output_dir.to_path_buf(),
    format: OutputFormat::Html,
    ..Config::default()
  }
}

/// Decode the payload of the first `data:` URI at or after `from`.
fn decode_data_uri_payload(html: &str, from: usize) -> (Vec<u8>, usize) {
  let prefix = "base64,";
  let start =
    html[from..].find(prefix).expect("Data URI should be present")
      + from
      + prefix.len();
  let end = html[start..].find('"').expect("Attribute should close") + start;
  let decoded = base64::engine::general_purpose::STANDARD
    .decode(&html[start..end])
    .expect("Payload should be valid base64");
  (decoded, end)
}

#[test]
fn per_file_run_writes_anchored_pages_with_toc() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  write_file(
    &input.path().join("guide.md"),
    "# Getting Started\n\nIntro.\n\n## Install & Run\n\nSteps.\n",
  );

  let config = html_config(input.path(), output.path());
  assemble::run(&config).expect("Assembly should succeed");

  let page = fs::read_to_string(output.path().join("guide.html"))
    .expect("Output page should exist");

  assert!(page.contains("<title>Getting Started</title>"));
  assert!(page.contains(r#"<h1 id="getting-started">Getting Started</h1>"#));
  // Heading text passes through entity encoding before anchors bind.
  assert!(page.contains(r#"<h2 id="install-run">Install &amp; Run</h2>"#));
  assert!(page.contains(r#"<nav class="toc">"#));
  // ToC entries carry the raw heading text, not the entity-encoded form.
  assert!(page.contains(r##"<a href="#install-run">Install & Run</a>"##));
  assert!(page.contains(r#"style="margin-left: 20px""#));
  assert!(!page.contains("page-break\"></div>"));
}

#[test]
fn combined_run_qualifies_anchors_per_source_file() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  write_file(&input.path().join("alpha.md"), "## Overview\n\nA.\n");
  write_file(&input.path().join("beta.md"), "## Overview\n\nB.\n");

  let config = Config {
    single: true,
    title: "Handbook".to_string(),
    ..html_config(input.path(), output.path())
  };
  assemble::run(&config).expect("Assembly should succeed");

  let page = fs::read_to_string(output.path().join("combined.html"))
    .expect("Combined output should exist");

  // File boundary headings anchor each source document.
  assert!(page.contains(r#"<h1 id="alpha-md">alpha.md</h1>"#));
  assert!(page.contains(r#"<h1 id="beta-md">beta.md</h1>"#));
  // The shared heading text gets distinct, source-qualified anchors.
  assert!(page.contains(r#"<h2 id="overview-alpha-md">Overview</h2>"#));
  assert!(page.contains(r#"<h2 id="overview-beta-md">Overview</h2>"#));
  assert!(page.contains("<title>Handbook</title>"));
  assert!(!output.path().join("alpha.html").exists());
}

#[test]
fn empty_input_directory_is_an_error() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");

  let config = html_config(input.path(), output.path());
  let err = assemble::run(&config).expect_err("Empty input should fail");
  assert!(err.to_string().contains("no markdown documents"));
}

#[test]
fn linked_mode_copies_image_bytes_and_rewrites_reference() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  let image_bytes = b"\x89PNG\r\n\x1a\nfake-payload";
  fs::create_dir_all(input.path().join("img"))
    .expect("Failed to create img dir");
  fs::write(input.path().join("img/logo.png"), image_bytes)
    .expect("Failed to write image");
  write_file(
    &input.path().join("doc.md"),
    "# Doc\n\n![Logo](./img/logo.png)\n",
  );

  let config = html_config(input.path(), output.path());
  assemble::run(&config).expect("Assembly should succeed");

  let copied = fs::read(output.path().join("images/img/logo.png"))
    .expect("Image should be copied into the output tree");
  assert_eq!(copied, image_bytes);

  let page = fs::read_to_string(output.path().join("doc.html"))
    .expect("Output page should exist");
  assert!(page.contains(r#"src="images/img/logo.png""#));
  assert!(!page.contains("./img/logo.png"));
}

#[test]
fn missing_image_degrades_to_unchanged_reference() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  write_file(
    &input.path().join("doc.md"),
    "# Doc\n\n![Gone](./img/missing.png)\n",
  );

  let config = html_config(input.path(), output.path());
  assemble::run(&config).expect("Missing image must not abort the run");

  let page = fs::read_to_string(output.path().join("doc.html"))
    .expect("Output page should exist");
  assert!(page.contains(r#"src="./img/missing.png""#));
}

#[test]
fn external_references_pass_through_untouched() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  write_file(
    &input.path().join("doc.md"),
    "# Doc\n\n![Badge](https://example.com/badge.svg)\n",
  );

  let config = html_config(input.path(), output.path());
  assemble::run(&config).expect("Assembly should succeed");

  let page = fs::read_to_string(output.path().join("doc.html"))
    .expect("Output page should exist");
  assert!(page.contains(r#"src="https://example.com/badge.svg""#));
  assert!(!output.path().join("images").exists());
}

#[test]
fn embedded_mode_inlines_image_as_data_uri() {
  let dir = tempdir().expect("Failed to create temp dir");
  let image_bytes = b"GIF89a-not-really";
  fs::write(dir.path().join("pic.gif"), image_bytes)
    .expect("Failed to write image");
  let source = dir.path().join("doc.md");
  let refs = extract_image_refs("![Pic](pic.gif)\n", &source);

  let remap = RemapRules::default();
  let resolver = ImageResolver::new(&remap, dir.path());
  let html = resolver
    .resolve(
      r#"<p><img src="pic.gif" alt="Pic" /></p>"#,
      &refs,
      EmbedMode::Embedded,
    )
    .expect("Embedding should succeed");

  assert!(html.contains(r#"src="data:image/gif;base64,"#));
  let (decoded, _) = decode_data_uri_payload(&html, 0);
  assert_eq!(decoded, image_bytes);
}

#[test]
fn embedded_mode_resolves_shared_raw_path_per_source() {
  let dir = tempdir().expect("Failed to create temp dir");
  let bytes_a = b"bytes-of-a";
  let bytes_b = b"bytes-of-b";
  fs::create_dir_all(dir.path().join("a")).expect("Failed to create dir");
  fs::create_dir_all(dir.path().join("b")).expect("Failed to create dir");
  fs::write(dir.path().join("a/logo.png"), bytes_a)
    .expect("Failed to write image");
  fs::write(dir.path().join("b/logo.png"), bytes_b)
    .expect("Failed to write image");

  // A merged corpus: two documents in different directories, same raw path.
  let mut refs =
    extract_image_refs("![l](logo.png)\n", &dir.path().join("a/doc.md"));
  refs.extend(extract_image_refs(
    "![l](logo.png)\n",
    &dir.path().join("b/doc.md"),
  ));

  let remap = RemapRules::default();
  let resolver = ImageResolver::new(&remap, dir.path());
  let html = resolver
    .resolve(
      r#"<img src="logo.png" alt="l" /><img src="logo.png" alt="l" />"#,
      &refs,
      EmbedMode::Embedded,
    )
    .expect("Embedding should succeed");

  // Each element embeds the bytes next to its own source document.
  let (first, after_first) = decode_data_uri_payload(&html, 0);
  let (second, _) = decode_data_uri_payload(&html, after_first);
  assert_eq!(first, bytes_a);
  assert_eq!(second, bytes_b);
}

#[test]
fn remap_rules_redirect_image_lookup_and_output_path() {
  let input = tempdir().expect("Failed to create input dir");
  let output = tempdir().expect("Failed to create output dir");
  let image_bytes = b"png-bytes";
  fs::create_dir_all(input.path().join("_assets"))
    .expect("Failed to create assets dir");
  fs::write(input.path().join("_assets/chart.png"), image_bytes)
    .expect("Failed to write image");
  write_file(
    &input.path().join("doc.md"),
    "# Doc\n\n![Chart](assets/chart.png)\n",
  );

  let config = Config {
    remap: RemapRules::parse_pairs(&["assets/:_assets/".to_string()])
      .expect("Rule should parse"),
    ..html_config(input.path(), output.path())
  };
  assemble::run(&config).expect("Assembly should succeed");

  assert!(output.path().join("images/_assets/chart.png").is_file());
  let page = fs::read_to_string(output.path().join("doc.html"))
    .expect("Output page should exist");
  assert!(page.contains(r#"src="images/_assets/chart.png""#));
}

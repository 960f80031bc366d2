#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use std::fs;

use marksmith::{cli::RenderFlags, config::Config, error::CliError};
use tempfile::TempDir;

#[test]
fn test_generated_config_loads_back() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("marksmith.toml");

  Config::generate_default_config(&path).expect("Failed to write config");
  let config = Config::load(Some(&path)).expect("Failed to load config");
  assert_eq!(config, Config::default());
}

#[test]
fn test_config_file_with_cli_overrides() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("site.toml");
  fs::write(
    &path,
    "[extensions]\nignore_math = true\n\n[html]\nsmartypants = true\n",
  )
  .expect("Failed to write config");

  let mut config = Config::from_file(&path).expect("Failed to load config");
  config.merge_with_cli(&RenderFlags {
    toc: true,
    buffer_limit: Some(1 << 16),
    ..Default::default()
  });

  assert!(config.extensions.ignore_math);
  assert!(config.html.smartypants);
  assert!(config.html.toc);
  assert_eq!(config.buffer_limit, Some(1 << 16));
  assert_eq!(config.renderer().buffer_limit(), Some(1 << 16));
}

#[test]
fn test_invalid_toml_is_a_toml_error() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("broken.toml");
  fs::write(&path, "[html\ntoc = true\n").expect("Failed to write config");

  let err = Config::from_file(&path).expect_err("broken TOML should fail");
  assert!(matches!(err, CliError::Toml { .. }));
  assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_missing_config_file_is_an_error() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("absent.toml");
  let err = Config::load(Some(&path)).expect_err("missing file should fail");
  match err {
    CliError::Io { path: failed, .. } => assert_eq!(failed, path),
    other => panic!("expected an I/O error, got {other:?}"),
  }
}

#[test]
fn test_unwritable_config_path_is_an_io_error() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("no-such-dir").join("marksmith.toml");
  let err = Config::generate_default_config(&path)
    .expect_err("parent directory does not exist");
  assert!(matches!(err, CliError::Io { .. }));
}

#[test]
fn test_configured_renderer_renders_with_file_options() {
  let temp_dir = TempDir::new().expect("Failed to create temp dir");
  let path = temp_dir.path().join("marksmith.toml");
  fs::write(&path, "[html]\ntoc = true\n").expect("Failed to write config");

  let config = Config::from_file(&path).expect("Failed to load config");
  let html = config
    .renderer()
    .render("# One\n", &config.extensions, &config.html)
    .expect("render should succeed");
  assert!(html.contains("<a href=\"#toc_0\">One</a>"), "{html}");
  assert!(html.contains("<h1 id=\"toc_0\">One</h1>"), "{html}");
}

//! # Configuration Module
//!
//! This module provides the catalog of supported file types, the header
//! preamble and the license bodies that copyrightify renders into headers.
//!
//! A default catalog is compiled into the binary. It can be replaced by a TOML
//! file passed with `--config` or named by the `COPYRIGHTIFY_CONFIG`
//! environment variable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::templates::{Template, TemplateError};
use crate::verbose_log;

/// The catalog bundled with the tool.
pub const DEFAULT_CONFIG: &str = include_str!("config.toml");

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "COPYRIGHTIFY_CONFIG";

/// Word whose presence near the top of a file means it already has a header.
pub const COPYRIGHT_MARKER: &str = "Copyright";

/// Only scan this many lines of a file when looking for an existing header.
pub const COPYRIGHT_SCAN_LINES: usize = 20;

/// Comment syntax for one file type.
///
/// Line-comment languages only set `prefix`; block-comment languages also set
/// `open` and `close`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileTypeRule {
  /// Line opening the comment block (e.g., "/*").
  #[serde(default)]
  open: Option<String>,

  /// Prefix for every header line (e.g., " * " or "# "). May be empty.
  prefix: String,

  /// Line closing the comment block (e.g., " */").
  #[serde(default)]
  close: Option<String>,
}

impl FileTypeRule {
  pub fn open(&self) -> Option<&str> {
    self.open.as_deref().filter(|s| !s.is_empty())
  }

  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  pub fn close(&self) -> Option<&str> {
    self.close.as_deref().filter(|s| !s.is_empty())
  }
}

const fn default_scan_lines() -> usize {
  COPYRIGHT_SCAN_LINES
}

fn default_marker() -> String {
  COPYRIGHT_MARKER.to_string()
}

/// The full catalog: file types, preamble and license bodies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Template rendered above every license body.
  preamble: String,

  /// Word that marks an existing header.
  #[serde(default = "default_marker")]
  marker: String,

  /// Number of leading lines searched for `marker`.
  #[serde(default = "default_scan_lines")]
  scan_lines: usize,

  /// Comment rules keyed by type identifier (extension or interpreter name).
  #[serde(default)]
  filetypes: BTreeMap<String, FileTypeRule>,

  /// License body templates keyed by license identifier.
  licenses: BTreeMap<String, String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config document contains invalid TOML.
  #[error("Failed to parse config '{origin}': {source}")]
  ParseError { origin: String, source: toml::de::Error },

  /// A file type entry is invalid.
  #[error("Invalid file type '{file_type}': {message}")]
  InvalidFileType { file_type: String, message: String },

  /// A template references something it is not allowed to.
  #[error("Invalid template in {what}: {source}")]
  InvalidTemplate { what: String, source: TemplateError },

  /// The config defines no licenses at all.
  #[error("Config defines no licenses")]
  NoLicenses,

  /// The marker word is empty.
  #[error("Config marker cannot be empty")]
  EmptyMarker,

  /// The scan bound is zero.
  #[error("scan-lines must be at least 1")]
  InvalidScanLines,

  /// The selected license is not in the config.
  #[error("Unknown license '{license}' (choose one of: {available})")]
  UnknownLicense { license: String, available: String },

  /// A rendered header would not be recognised as a header on the next run.
  #[error("Header for file type '{file_type}' does not contain '{marker}' within its first {scan_lines} lines")]
  MarkerNotRendered {
    file_type: String,
    marker: String,
    scan_lines: usize,
  },
}

impl Config {
  /// Load the catalog bundled with the tool.
  pub fn bundled() -> Result<Self, ConfigError> {
    Self::from_toml(DEFAULT_CONFIG, "<bundled>")
  }

  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    Self::from_toml(&content, &path.display().to_string())
  }

  /// Parse and validate a TOML document. `origin` names the document in errors.
  pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
      origin: origin.to_string(),
      source: e,
    })?;

    config.validate()?;
    let config = config.normalize();

    verbose_log!(
      "Loaded {} file types and {} licenses from {}",
      config.filetypes.len(),
      config.licenses.len(),
      origin
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - At least one license exists
  /// - File type keys are non-empty and don't include a leading dot
  /// - The marker is non-empty and the scan bound is positive
  /// - Every template only references known variables
  fn validate(&self) -> Result<(), ConfigError> {
    if self.licenses.is_empty() {
      return Err(ConfigError::NoLicenses);
    }

    if self.marker.is_empty() {
      return Err(ConfigError::EmptyMarker);
    }

    if self.scan_lines == 0 {
      return Err(ConfigError::InvalidScanLines);
    }

    for file_type in self.filetypes.keys() {
      if file_type.is_empty() {
        return Err(ConfigError::InvalidFileType {
          file_type: file_type.clone(),
          message: "type identifier cannot be empty".to_string(),
        });
      }

      if file_type.starts_with('.') {
        return Err(ConfigError::InvalidFileType {
          file_type: file_type.clone(),
          message: "type identifier should not include leading dot".to_string(),
        });
      }
    }

    Template::parse(&self.preamble).map_err(|source| ConfigError::InvalidTemplate {
      what: "preamble".to_string(),
      source,
    })?;

    for (id, text) in &self.licenses {
      Template::parse(text).map_err(|source| ConfigError::InvalidTemplate {
        what: format!("license '{id}'"),
        source,
      })?;
    }

    Ok(())
  }

  /// Treat empty open/close markers as absent so rules compare by meaning.
  fn normalize(self) -> Self {
    let filetypes = self
      .filetypes
      .into_iter()
      .map(|(id, rule)| {
        let rule = FileTypeRule {
          open: rule.open.filter(|s| !s.is_empty()),
          prefix: rule.prefix,
          close: rule.close.filter(|s| !s.is_empty()),
        };
        (id, rule)
      })
      .collect();

    Self { filetypes, ..self }
  }

  pub fn preamble(&self) -> &str {
    &self.preamble
  }

  pub fn marker(&self) -> &str {
    &self.marker
  }

  pub const fn scan_lines(&self) -> usize {
    self.scan_lines
  }

  pub fn file_type(&self, id: &str) -> Option<&FileTypeRule> {
    self.filetypes.get(id)
  }

  /// Iterate over `(type identifier, rule)` pairs in identifier order.
  pub fn file_types(&self) -> impl Iterator<Item = (&String, &FileTypeRule)> {
    self.filetypes.iter()
  }

  pub fn type_ids(&self) -> impl Iterator<Item = &str> {
    self.filetypes.keys().map(String::as_str)
  }

  pub fn license_text(&self, id: &str) -> Option<&str> {
    self.licenses.get(id).map(String::as_str)
  }

  /// License identifiers in sorted order.
  pub fn license_ids(&self) -> impl Iterator<Item = &str> {
    self.licenses.keys().map(String::as_str)
  }
}

/// Resolve the configuration for this run.
///
/// The configuration is selected in the following order:
/// 1. `explicit_path`, when given on the command line
/// 2. The file named by the `COPYRIGHTIFY_CONFIG` environment variable
/// 3. The bundled catalog
pub fn load_config(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
  if let Some(path) = explicit_path {
    return Config::load(path);
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR)
    && !env_path.is_empty()
  {
    verbose_log!("Using config from {} environment variable", CONFIG_ENV_VAR);
    return Config::load(Path::new(&env_path));
  }

  Config::bundled()
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_bundled_config_is_valid() {
    let config = Config::bundled().unwrap();
    assert_eq!(config.marker(), COPYRIGHT_MARKER);
    assert_eq!(config.scan_lines(), COPYRIGHT_SCAN_LINES);
    assert!(config.license_text("proprietary").is_some());
    assert!(config.file_type("py").is_some());
    assert!(config.file_type("sh").is_some());
    assert!(config.file_type("python").is_some());
  }

  #[test]
  fn test_rule_accessors_normalise_empty_markers() {
    let config = Config::from_toml(
      r##"
preamble = "Copyright"
[filetypes]
sh = { open = "", prefix = "# ", close = "" }
c = { open = "/*", prefix = " * ", close = " */" }
txt = { prefix = "" }
[licenses]
x = "body"
"##,
      "test",
    )
    .unwrap();

    let sh = config.file_type("sh").unwrap();
    assert_eq!(sh.open(), None);
    assert_eq!(sh.prefix(), "# ");
    assert_eq!(sh.close(), None);
    let c = config.file_type("c").unwrap();
    assert_eq!((c.open(), c.prefix(), c.close()), (Some("/*"), " * ", Some(" */")));
    assert_eq!(config.file_type("txt").unwrap().prefix(), "");
  }

  #[test]
  fn test_missing_prefix_is_parse_error() {
    let err = Config::from_toml(
      r##"
preamble = "Copyright"
[filetypes]
c = { open = "/*", close = " */" }
[licenses]
x = "body"
"##,
      "test",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
  }

  #[test]
  fn test_leading_dot_rejected() {
    let err = Config::from_toml(
      r##"
preamble = "Copyright"
[filetypes]
".py" = { prefix = "# " }
[licenses]
x = "body"
"##,
      "test",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFileType { .. }));
  }

  #[test]
  fn test_no_licenses_rejected() {
    let err = Config::from_toml("preamble = \"Copyright\"\n[licenses]\n", "test").unwrap_err();
    assert!(matches!(err, ConfigError::NoLicenses));
  }

  #[test]
  fn test_unknown_template_variable_rejected() {
    let err = Config::from_toml(
      "preamble = \"Copyright {{ home_dir }}\"\n[licenses]\nx = \"body\"\n",
      "test",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTemplate { ref what, .. } if what == "preamble"));
  }

  #[test]
  fn test_zero_scan_lines_rejected() {
    let err = Config::from_toml(
      "preamble = \"Copyright\"\nscan-lines = 0\n[licenses]\nx = \"body\"\n",
      "test",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidScanLines));
  }

  #[test]
  fn test_load_from_file_and_missing_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("catalog.toml");
    fs::write(&path, "preamble = \"Copyright\"\n[licenses]\nmine = \"body\"\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.license_ids().collect::<Vec<_>>(), vec!["mine"]);

    let err = load_config(Some(&temp_dir.path().join("missing.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
  }

  #[test]
  fn test_license_ids_sorted() {
    let config = Config::bundled().unwrap();
    let ids: Vec<_> = config.license_ids().collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
  }
}

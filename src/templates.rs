//! # Templates Module
//!
//! This module provides the constrained template engine used for license
//! headers, and the [`HeaderRenderer`] that wraps the preamble and license body
//! in the comment style of a given file type.
//!
//! The module includes:
//! - [`Template`] for parsing and rendering `{{ variable }}` templates
//! - [`RenderContext`] for the identity, year and license data fed into them
//! - [`HeaderRenderer`] for producing the comment-wrapped header of a file
//!
//! Only the variables listed in [`Variable`] may appear in a template. Any
//! other `{{ ... }}` placeholder is rejected when the template is parsed, so a
//! configuration can never reach data it was not meant to see.
//!
//! ## Example
//!
//! ```rust
//! use copyrightify::config::Config;
//! use copyrightify::identity::Identity;
//! use copyrightify::templates::{HeaderRenderer, RenderContext};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::bundled()?;
//! let renderer = HeaderRenderer::new(&config, "mit")?;
//!
//! let context = RenderContext::new(
//!   Identity {
//!     name: "Jane Doe".to_string(),
//!     email: "jane@example.com".to_string(),
//!     organization: "Example Corp".to_string(),
//!   },
//!   2025,
//!   "mit".to_string(),
//! );
//!
//! let header = renderer.render("py", &context, "main.py").expect("py is configured");
//! assert!(header.contains("# \\file      main.py"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::config::{Config, ConfigError, FileTypeRule};
use crate::identity::Identity;

/// Matches a `{{ variable }}` placeholder, with optional inner whitespace.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex must compile")
});

/// Errors raised while parsing a template.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
  /// The template references a variable that is not exposed to templates.
  #[error("unknown template variable '{name}' (expected one of: {expected})")]
  UnknownVariable { name: String, expected: String },
}

/// A variable that templates are allowed to reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
  Name,
  Email,
  Organization,
  Year,
  License,
  Filename,
}

impl Variable {
  pub const ALL: [Variable; 6] = [
    Variable::Name,
    Variable::Email,
    Variable::Organization,
    Variable::Year,
    Variable::License,
    Variable::Filename,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      Variable::Name => "name",
      Variable::Email => "email",
      Variable::Organization => "organization",
      Variable::Year => "year",
      Variable::License => "license",
      Variable::Filename => "filename",
    }
  }

  fn expected_list() -> String {
    Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
  }
}

impl fmt::Display for Variable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Variable {
  type Err = TemplateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|v| v.as_str() == s)
      .ok_or_else(|| TemplateError::UnknownVariable {
        name: s.to_string(),
        expected: Self::expected_list(),
      })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Variable(Variable),
}

/// A parsed template: literal text interleaved with [`Variable`] references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  segments: Vec<Segment>,
}

impl Template {
  /// Parses `source`, rejecting any placeholder that is not a [`Variable`].
  pub fn parse(source: &str) -> Result<Self, TemplateError> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(source) {
      let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        continue;
      };
      if whole.start() > last {
        segments.push(Segment::Literal(source[last..whole.start()].to_string()));
      }
      segments.push(Segment::Variable(name.as_str().parse()?));
      last = whole.end();
    }

    if last < source.len() {
      segments.push(Segment::Literal(source[last..].to_string()));
    }

    Ok(Self { segments })
  }

  /// Renders the template, substituting every variable from `context` and the
  /// per-file `filename`.
  pub fn render(&self, context: &RenderContext, filename: &str) -> String {
    let mut rendered = String::new();
    for segment in &self.segments {
      match segment {
        Segment::Literal(text) => rendered.push_str(text),
        Segment::Variable(Variable::Filename) => rendered.push_str(filename),
        Segment::Variable(Variable::Year) => rendered.push_str(&context.year.to_string()),
        Segment::Variable(var) => rendered.push_str(context.value(*var)),
      }
    }
    rendered
  }
}

/// Data used to fill out a header template.
///
/// Built once at startup and shared read-only by every candidate; the file
/// name is the only per-file input and is passed to [`Template::render`]
/// separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
  identity: Identity,
  year: i32,
  license: String,
}

impl RenderContext {
  pub const fn new(identity: Identity, year: i32, license: String) -> Self {
    Self {
      identity,
      year,
      license,
    }
  }

  pub fn license(&self) -> &str {
    &self.license
  }

  fn value(&self, var: Variable) -> &str {
    match var {
      Variable::Name => &self.identity.name,
      Variable::Email => &self.identity.email,
      Variable::Organization => &self.identity.organization,
      Variable::License => &self.license,
      Variable::Year | Variable::Filename => "",
    }
  }
}

/// Builds the comment-wrapped, unrendered header template for one file type.
///
/// The result is the opening marker on its own line (if any), then every line
/// of `preamble`, a blank line and `license_text`, each carrying the line
/// prefix with trailing whitespace removed, then the closing marker (if any)
/// without a newline of its own.
pub fn comment_template(rule: &FileTypeRule, preamble: &str, license_text: &str) -> String {
  let mut template = String::new();

  if let Some(open) = rule.open() {
    template.push_str(open);
    template.push('\n');
  }

  let body = format!("{}\n\n{}", preamble.trim_end_matches('\n'), license_text);
  for line in body.lines() {
    let prefixed = format!("{}{}", rule.prefix(), line);
    template.push_str(prefixed.trim_end());
    template.push('\n');
  }

  if let Some(close) = rule.close() {
    template.push_str(close);
  }

  template
}

/// Renders license headers for every file type known to a [`Config`].
///
/// All templates are built and parsed when the renderer is constructed, so
/// rendering a header for a file is a plain substitution that cannot fail.
#[derive(Debug)]
pub struct HeaderRenderer {
  templates: BTreeMap<String, Template>,
}

impl HeaderRenderer {
  /// Creates a renderer for the license identified by `license`.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  /// - `license` is not a key of the configuration's license table
  /// - a rendered header would not carry the configuration's marker within the
  ///   scanned prefix, which would make a second run add a second header
  pub fn new(config: &Config, license: &str) -> Result<Self, ConfigError> {
    let license_text = config.license_text(license).ok_or_else(|| ConfigError::UnknownLicense {
      license: license.to_string(),
      available: config.license_ids().collect::<Vec<_>>().join(", "),
    })?;

    let probe = RenderContext::new(Identity::default(), 0, license.to_string());
    // The marker must survive behind a shebang line, which takes the first slot.
    let visible_lines = config.scan_lines().saturating_sub(1);

    let mut templates = BTreeMap::new();
    for (file_type, rule) in config.file_types() {
      let source = comment_template(rule, config.preamble(), license_text);
      let template = Template::parse(&source).map_err(|source| ConfigError::InvalidTemplate {
        what: format!("header for file type '{file_type}'"),
        source,
      })?;

      let rendered = template.render(&probe, "");
      if !rendered.lines().take(visible_lines).any(|line| line.contains(config.marker())) {
        return Err(ConfigError::MarkerNotRendered {
          file_type: file_type.clone(),
          marker: config.marker().to_string(),
          scan_lines: config.scan_lines(),
        });
      }

      trace!("Built header template for '{}'", file_type);
      templates.insert(file_type.clone(), template);
    }

    Ok(Self { templates })
  }

  /// Renders the header for `file_type`.
  ///
  /// Returns `None` when the file type has no rule in the configuration; the
  /// caller reports the file as unsupported.
  pub fn render(&self, file_type: &str, context: &RenderContext, filename: &str) -> Option<String> {
    self
      .templates
      .get(file_type)
      .map(|template| template.render(context, filename))
  }
}

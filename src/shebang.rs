//! # Shebang Module
//!
//! Detects interpreter directives (`#!/...`) and XML prologs (`<?xml ...`) on
//! the first line of a file, and infers a file type from them.

use std::sync::LazyLock;

use regex::Regex;

/// Matches an interpreter directive or an XML prolog at the start of a line.
static SHEBANG_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(#!/.*|<\?xml.*)").expect("shebang regex must compile"));

/// A first line that must stay first in the rewritten file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shebang {
  /// The line exactly as read, including its line ending if it had one.
  pub line: String,
  /// The type identifier found in the line, if any.
  pub file_type: Option<String>,
}

/// Finds shebangs and maps them onto configured type identifiers.
#[derive(Debug, Clone)]
pub struct ShebangDetector {
  /// Known type identifiers, longest first.
  candidates: Vec<String>,
}

impl ShebangDetector {
  /// Creates a detector over the given type identifiers.
  ///
  /// Identifiers are tried longest first, so `python` wins over `py`; equal
  /// lengths are tried in lexical order to keep detection deterministic.
  pub fn new<'a>(type_ids: impl IntoIterator<Item = &'a str>) -> Self {
    let mut candidates: Vec<String> = type_ids.into_iter().map(str::to_string).collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    Self { candidates }
  }

  /// Inspects `line` for a shebang.
  ///
  /// Returns `None` if the line is not a shebang. Otherwise the returned
  /// [`Shebang`] carries the first identifier that occurs anywhere in the
  /// line, or no type when none does.
  pub fn detect(&self, line: &str) -> Option<Shebang> {
    if !SHEBANG_REGEX.is_match(line) {
      return None;
    }

    let file_type = self
      .candidates
      .iter()
      .find(|candidate| line.contains(candidate.as_str()))
      .cloned();

    Some(Shebang {
      line: line.to_string(),
      file_type,
    })
  }
}

//! # Diff Module
//!
//! This module renders the change a dry run would have made to a file.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Renders and prints dry-run diffs.
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,
}

impl DiffManager {
  pub const fn new(show_diff: bool) -> Self {
    Self { show_diff }
  }

  /// Prints the diff between `original` and `new` to stderr, if enabled.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) {
    if !self.show_diff {
      return;
    }

    eprintln!("{}", render_diff(path, original, new));
  }
}

/// Renders the diff with one `+`/`-`/` ` prefixed line per change.
///
/// Inserted and deleted lines are coloured when stderr supports it.
pub fn render_diff(path: &Path, original: &str, new: &str) -> String {
  let mut rendered = format!("Diff for {}:\n", path.display());

  for change in TextDiff::from_lines(original, new).iter_all_changes() {
    // `Change`'s Display supplies the newline a final unterminated line lacks.
    match change.tag() {
      ChangeTag::Insert => {
        let line = format!("+{change}");
        rendered.push_str(&line.if_supports_color(Stream::Stderr, |l| l.green()).to_string());
      }
      ChangeTag::Delete => {
        let line = format!("-{change}");
        rendered.push_str(&line.if_supports_color(Stream::Stderr, |l| l.red()).to_string());
      }
      ChangeTag::Equal => rendered.push_str(&format!(" {change}")),
    }
  }

  rendered
}

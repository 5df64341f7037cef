//! # Output Module
//!
//! This module centralizes all user-facing output for the copyrightify tool.
//!
//! Per-file results that need no attention (added, already licensed, skipped)
//! go to stdout and are silenced by `-q`. Failures (write failures, invalid
//! paths, unexpected errors) go to stderr and are always shown.

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileReport, Outcome, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Header added
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped
  pub const SKIPPED: &str = "-";
}

/// The operator-facing line for a report, without symbol or colour.
pub fn describe(report: &FileReport) -> String {
  let path = report.path.display();
  match &report.outcome {
    Outcome::Added => format!("Added copyright to {path}"),
    Outcome::WouldAdd => format!("Would add copyright to {path}"),
    Outcome::AlreadyLicensed => format!("Contains copyright already, skipping {path}"),
    Outcome::Unsupported { file_type: Some(t) } => {
      format!("Extension is unsupported, skipping {path} (type '{t}')")
    }
    Outcome::Unsupported { file_type: None } => format!("Extension is unsupported, skipping {path}"),
    Outcome::Unreadable => format!("Not a text file, skipping {path}"),
    Outcome::WriteFailed { reason } => format!("Could not overwrite with changes, skipping {path}: {reason}"),
    Outcome::InvalidPath => format!("Not a valid path, skipping {path}"),
    Outcome::Failed { reason } => format!("Failed to process {path}: {reason}"),
  }
}

/// Print the result for one candidate on the channel matching its outcome.
pub fn print_file_report(report: &FileReport) {
  let message = describe(report);

  if report.outcome.is_failure() {
    eprintln!(
      "{} {}",
      symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
      message
    );
    return;
  }

  if is_quiet() {
    return;
  }

  match report.outcome {
    Outcome::Added | Outcome::WouldAdd => println!(
      "{} {}",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
      message
    ),
    _ => println!(
      "{} {}",
      symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      message.if_supports_color(Stream::Stdout, |m| m.dimmed())
    ),
  }
}

/// Print the list of license identifiers, one per line.
pub fn print_licenses<'a>(ids: impl Iterator<Item = &'a str>) {
  for id in ids {
    println!("{id}");
  }
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Format the processing summary line.
///
/// Format: "Summary: X added, Y already licensed, Z skipped, W failed"
pub fn format_summary(summary: &ProcessingSummary, dry_run: bool) -> String {
  let added_word = if dry_run { "to add" } else { "added" };

  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  format!(
    "Summary: {} {}, {} already licensed, {} skipped, {} failed",
    summary.added.if_supports_color(Stream::Stdout, |s| s.cyan()),
    added_word,
    summary.already_licensed.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    failed_str
  )
}

/// Print the processing summary. In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let mut summary_line = format_summary(summary, dry_run);
  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;

  #[test]
  fn test_describe_messages() {
    let report = FileReport::new(PathBuf::from("src/a.py"), Outcome::Added);
    assert_eq!(describe(&report), "Added copyright to src/a.py");

    let report = FileReport::new(PathBuf::from("a.py"), Outcome::AlreadyLicensed);
    assert_eq!(describe(&report), "Contains copyright already, skipping a.py");

    let report = FileReport::new(PathBuf::from("a.xyz"), Outcome::Unsupported { file_type: None });
    assert_eq!(describe(&report), "Extension is unsupported, skipping a.xyz");

    let report = FileReport::new(PathBuf::from("nope"), Outcome::InvalidPath);
    assert_eq!(describe(&report), "Not a valid path, skipping nope");
  }

  #[test]
  fn test_format_summary_plain() {
    owo_colors::set_override(false);
    let summary = ProcessingSummary {
      total: 4,
      added: 1,
      already_licensed: 1,
      skipped: 1,
      failed: 1,
      ..Default::default()
    };
    assert_eq!(
      format_summary(&summary, false),
      "Summary: 1 added, 1 already licensed, 1 skipped, 1 failed"
    );
    assert_eq!(
      format_summary(&summary, true),
      "Summary: 1 to add, 1 already licensed, 1 skipped, 1 failed"
    );
    owo_colors::unset_override();
  }
}

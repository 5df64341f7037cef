//! # Report Module
//!
//! This module records what happened to each candidate file and aggregates
//! the per-file outcomes into a run summary.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal outcome of one candidate.
///
/// Every variant is final and independent of every other candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// A header was inserted.
  Added,
  /// A header would have been inserted (dry run).
  WouldAdd,
  /// The file already carries a header and was left untouched.
  AlreadyLicensed,
  /// No comment rule exists for the file's type.
  Unsupported { file_type: Option<String> },
  /// The file is not UTF-8 text.
  Unreadable,
  /// The new content could not replace the original.
  WriteFailed { reason: String },
  /// The path given on the command line is neither a file nor a directory.
  InvalidPath,
  /// Any other failure while processing the file.
  Failed { reason: String },
}

impl Outcome {
  /// Whether the outcome should be reported on the error stream.
  pub const fn is_failure(&self) -> bool {
    matches!(
      self,
      Outcome::WriteFailed { .. } | Outcome::InvalidPath | Outcome::Failed { .. }
    )
  }

  /// Whether the candidate was skipped on purpose.
  pub const fn is_skip(&self) -> bool {
    matches!(self, Outcome::Unsupported { .. } | Outcome::Unreadable)
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Outcome::Added => write!(f, "added"),
      Outcome::WouldAdd => write!(f, "would add"),
      Outcome::AlreadyLicensed => write!(f, "already licensed"),
      Outcome::Unsupported { file_type: Some(t) } => write!(f, "unsupported type '{t}'"),
      Outcome::Unsupported { file_type: None } => write!(f, "unsupported type"),
      Outcome::Unreadable => write!(f, "not text"),
      Outcome::WriteFailed { reason } => write!(f, "write failed: {reason}"),
      Outcome::InvalidPath => write!(f, "invalid path"),
      Outcome::Failed { reason } => write!(f, "failed: {reason}"),
    }
  }
}

/// Outcome of one candidate, with its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
  pub path: PathBuf,
  pub outcome: Outcome,
}

impl FileReport {
  pub const fn new(path: PathBuf, outcome: Outcome) -> Self {
    Self { path, outcome }
  }
}

/// Summary statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
  /// Candidates seen, including invalid paths
  pub total: usize,
  /// Headers inserted (or that would be, in a dry run)
  pub added: usize,
  /// Files that already had a header
  pub already_licensed: usize,
  /// Unsupported or non-text files
  pub skipped: usize,
  /// Write failures, invalid paths and unexpected errors
  pub failed: usize,
  /// Wall-clock time of the run
  pub processing_time: Duration,
}

impl ProcessingSummary {
  /// Build a summary from per-file reports.
  pub fn from_reports(reports: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      total: reports.len(),
      processing_time,
      ..Self::default()
    };

    for report in reports {
      match &report.outcome {
        Outcome::Added | Outcome::WouldAdd => summary.added += 1,
        Outcome::AlreadyLicensed => summary.already_licensed += 1,
        outcome if outcome.is_skip() => summary.skipped += 1,
        _ => summary.failed += 1,
      }
    }

    summary
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_summary_counts() {
    let reports = vec![
      FileReport::new("a.py".into(), Outcome::Added),
      FileReport::new("b.py".into(), Outcome::WouldAdd),
      FileReport::new("c.py".into(), Outcome::AlreadyLicensed),
      FileReport::new("d.bin".into(), Outcome::Unreadable),
      FileReport::new("e.xyz".into(), Outcome::Unsupported {
        file_type: Some("xyz".into()),
      }),
      FileReport::new("f.py".into(), Outcome::WriteFailed {
        reason: "read-only".into(),
      }),
      FileReport::new("missing".into(), Outcome::InvalidPath),
    ];

    let summary = ProcessingSummary::from_reports(&reports, Duration::from_millis(5));
    assert_eq!(summary.total, 7);
    assert_eq!(summary.added, 2);
    assert_eq!(summary.already_licensed, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.failed, 2);
  }

  #[test]
  fn test_failure_classification() {
    assert!(Outcome::InvalidPath.is_failure());
    assert!(Outcome::Failed { reason: "x".into() }.is_failure());
    assert!(!Outcome::Unreadable.is_failure());
    assert!(!Outcome::Added.is_failure());
  }

  #[test]
  fn test_display() {
    assert_eq!(
      Outcome::Unsupported {
        file_type: Some("xyz".into())
      }
      .to_string(),
      "unsupported type 'xyz'"
    );
    assert_eq!(Outcome::AlreadyLicensed.to_string(), "already licensed");
  }
}

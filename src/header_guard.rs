//! # Header Guard Module
//!
//! This module decides whether a file already carries a copyright header. It
//! is consulted line by line while a file is being rewritten, so that finding
//! a header aborts the rewrite before anything is replaced.

use crate::config::{COPYRIGHT_MARKER, COPYRIGHT_SCAN_LINES, Config};

/// Trait for existing-header detectors.
///
/// Implementations look at one original line at a time, together with its
/// zero-based index in the file.
pub trait HeaderDetector: Send + Sync {
  /// Checks whether `line`, found at `index`, shows the file already has a header.
  fn detects(&self, index: usize, line: &str) -> bool;
}

/// Default detector: a case-sensitive search for a marker word in the first
/// `scan_lines` lines.
///
/// Markers further down are deliberately not looked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerGuard {
  marker: String,
  scan_lines: usize,
}

impl MarkerGuard {
  pub fn new(marker: impl Into<String>, scan_lines: usize) -> Self {
    Self {
      marker: marker.into(),
      scan_lines,
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(config.marker(), config.scan_lines())
  }
}

impl Default for MarkerGuard {
  fn default() -> Self {
    Self::new(COPYRIGHT_MARKER, COPYRIGHT_SCAN_LINES)
  }
}

impl HeaderDetector for MarkerGuard {
  fn detects(&self, index: usize, line: &str) -> bool {
    index < self.scan_lines && line.contains(&self.marker)
  }
}

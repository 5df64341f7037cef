//! # Processor Module
//!
//! This module contains the per-file header-injection pipeline and the batch
//! loop that drives it over every candidate.
//!
//! The module is organized into two submodules:
//! - [`walker`] - Expanding root paths into candidate files
//! - [`rewriter`] - Streaming the new content and replacing the original
//!
//! The [`Processor`] struct is the main entry point. For each candidate it
//! resolves the file type, renders the header, and rewrites the file unless it
//! already carries one. Every candidate ends in exactly one
//! [`Outcome`](crate::report::Outcome); no per-file failure stops the batch.

mod rewriter;
mod walker;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use rewriter::{FileRewriter, RewriteOutcome, StreamStatus};
use tracing::{debug, trace, warn};
pub use walker::{WalkError, walk_paths};

use crate::config::{Config, ConfigError};
use crate::diff::DiffManager;
use crate::file_type::{FileTypeResolver, ResolveError};
use crate::header_guard::{HeaderDetector, MarkerGuard};
use crate::output::print_file_report;
use crate::report::{FileReport, Outcome};
use crate::shebang::ShebangDetector;
use crate::templates::{HeaderRenderer, RenderContext};

/// Behaviour switches for a [`Processor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorOptions {
  /// Build the new content in memory and leave files untouched.
  pub dry_run: bool,
  /// Print a diff of each would-be change (dry run only).
  pub show_diff: bool,
  /// Print one line per candidate as it is processed.
  pub report_progress: bool,
}

/// Processor for adding copyright headers to files.
///
/// All state is built once and read-only afterwards; candidates are processed
/// one at a time, each opened and closed within its own call.
pub struct Processor {
  resolver: FileTypeResolver,
  renderer: HeaderRenderer,
  detector: Box<dyn HeaderDetector>,
  context: RenderContext,
  diff_manager: DiffManager,
  dry_run: bool,
  report_progress: bool,
}

impl Processor {
  /// Creates a new processor for the license named in `context`.
  ///
  /// # Errors
  ///
  /// Returns an error if the license is not in `config`, or if a rendered
  /// header would not be recognised as one on a later run.
  pub fn new(config: &Config, context: RenderContext, options: ProcessorOptions) -> Result<Self, ConfigError> {
    Self::with_detector(config, context, options, Box::new(MarkerGuard::from_config(config)))
  }

  /// Like [`Processor::new`], with a custom existing-header detector.
  pub fn with_detector(
    config: &Config,
    context: RenderContext,
    options: ProcessorOptions,
    detector: Box<dyn HeaderDetector>,
  ) -> Result<Self, ConfigError> {
    let renderer = HeaderRenderer::new(config, context.license())?;
    let resolver = FileTypeResolver::new(ShebangDetector::new(config.type_ids()));

    Ok(Self {
      resolver,
      renderer,
      detector,
      context,
      diff_manager: DiffManager::new(options.dry_run && options.show_diff),
      dry_run: options.dry_run,
      report_progress: options.report_progress,
    })
  }

  /// Processes every candidate found under `roots`.
  ///
  /// # Returns
  ///
  /// One report per candidate, in processing order, including invalid root
  /// paths.
  pub fn process(&self, roots: &[PathBuf], recursive: bool) -> Vec<FileReport> {
    let mut reports = Vec::new();

    for candidate in walk_paths(roots, recursive) {
      let report = match candidate {
        Ok(path) => {
          let outcome = self.process_file(&path);
          FileReport::new(path, outcome)
        }
        Err(WalkError::InvalidPath(path)) => FileReport::new(path, Outcome::InvalidPath),
        Err(WalkError::Traverse { path, source }) => {
          warn!("Skipping unreadable directory entry {}: {}", path.display(), source);
          FileReport::new(path, Outcome::Failed {
            reason: source.to_string(),
          })
        }
      };

      if self.report_progress {
        print_file_report(&report);
      }
      reports.push(report);
    }

    reports
  }

  /// Processes a single file.
  ///
  /// Errors are converted into [`Outcome::Failed`] here, so this never fails.
  pub fn process_file(&self, path: &Path) -> Outcome {
    trace!("Processing file: {}", path.display());

    match self.try_process_file(path) {
      Ok(outcome) => {
        debug!("{}: {}", path.display(), outcome);
        outcome
      }
      Err(e) => {
        debug!("{}: {:#}", path.display(), e);
        Outcome::Failed {
          reason: format!("{e:#}"),
        }
      }
    }
  }

  fn try_process_file(&self, path: &Path) -> Result<Outcome> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let resolution = match self.resolver.resolve(path, &mut reader) {
      Ok(resolution) => resolution,
      Err(ResolveError::NotText) => return Ok(Outcome::Unreadable),
      Err(ResolveError::Io(e)) => {
        return Err(e).with_context(|| format!("Failed to read file: {}", path.display()));
      }
    };

    let Some(file_type) = resolution.file_type else {
      return Ok(Outcome::Unsupported { file_type: None });
    };

    let filename = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();

    let Some(header) = self.renderer.render(&file_type, &self.context, &filename) else {
      return Ok(Outcome::Unsupported {
        file_type: Some(file_type),
      });
    };

    let shebang = resolution.shebang.as_deref();

    if self.dry_run {
      return self.preview(path, reader, shebang, &header);
    }

    let outcome = FileRewriter::rewrite_in_place(path, reader, shebang, &header, self.detector.as_ref())
      .with_context(|| format!("Failed to rewrite file: {}", path.display()))?;

    Ok(match outcome {
      RewriteOutcome::Rewritten => Outcome::Added,
      RewriteOutcome::HeaderFound => Outcome::AlreadyLicensed,
      RewriteOutcome::NotText => Outcome::Unreadable,
      RewriteOutcome::WriteFailed(reason) => Outcome::WriteFailed { reason },
    })
  }

  /// Runs the rewrite into memory only, optionally showing the diff.
  fn preview(&self, path: &Path, mut reader: BufReader<File>, shebang: Option<&str>, header: &str) -> Result<Outcome> {
    let mut new_content = Vec::new();
    let status = FileRewriter::stream_with_header(&mut reader, &mut new_content, shebang, header, self.detector.as_ref())
      .with_context(|| format!("Failed to read file: {}", path.display()))?;

    match status {
      StreamStatus::HeaderFound => return Ok(Outcome::AlreadyLicensed),
      StreamStatus::NotText => return Ok(Outcome::Unreadable),
      StreamStatus::Complete => {}
    }

    if self.diff_manager.show_diff {
      let original =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
      let new_content = String::from_utf8(new_content).context("Rendered content is not UTF-8")?;
      self.diff_manager.display_diff(path, &original, &new_content);
    }

    Ok(Outcome::WouldAdd)
  }
}

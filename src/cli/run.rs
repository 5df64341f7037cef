//! # Run Command
//!
//! Startup (configuration, identity, license selection) followed by the batch
//! run over every path given on the command line. Startup errors abort before
//! any file is touched; per-file problems only show up in the report.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use copyrightify::config::load_config;
use copyrightify::identity::{IdentityOverrides, default_git_config_path, load_identity};
use copyrightify::info_log;
use copyrightify::logging::{init_tracing, set_quiet, set_verbose};
use copyrightify::output::{print_blank_line, print_licenses, print_summary};
use copyrightify::processor::{Processor, ProcessorOptions};
use copyrightify::report::ProcessingSummary;
use copyrightify::templates::RenderContext;
use tracing::{debug, warn};

use super::Cli;

/// Run copyrightify with the parsed arguments.
pub fn run(cli: Cli) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(cli.quiet, cli.verbose);

  if cli.verbose > 0 {
    set_verbose();
  } else if cli.quiet {
    set_quiet();
  }
  cli.colors.apply();

  for arg in &cli.ignored_args {
    warn!("Ignoring unrecognized argument: {arg}");
  }

  let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

  if cli.list_licenses {
    print_licenses(config.license_ids());
    return Ok(());
  }

  if config.license_text(&cli.license).is_none() {
    bail!(
      "Unknown license '{}' (choose from: {})",
      cli.license,
      config.license_ids().collect::<Vec<_>>().join(", ")
    );
  }

  let git_config = cli.git_config.clone().or_else(default_git_config_path);
  debug!("Reading identity from {:?}", git_config);
  let identity = load_identity(git_config.as_deref(), IdentityOverrides {
    name: cli.name,
    email: cli.email,
    organization: cli.organization,
  })?;

  let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());
  let context = RenderContext::new(identity, year, cli.license);

  let processor = Processor::new(&config, context, ProcessorOptions {
    dry_run: cli.dry_run,
    show_diff: cli.show_diff,
    report_progress: true,
  })?;

  if cli.dry_run {
    info_log!("Dry run: no files will be modified");
  }

  let start_time = Instant::now();
  let reports = processor.process(&cli.paths, cli.recursive);
  let summary = ProcessingSummary::from_reports(&reports, start_time.elapsed());

  debug!("Processed {} candidates in {:?}", summary.total, summary.processing_time);

  print_blank_line();
  print_summary(&summary, cli.dry_run);

  Ok(())
}

//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing; arguments clap does not recognise are
//! dropped and reported instead of aborting the run.

mod run;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use copyrightify::logging::ColorMode;
pub use run::run;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add the default (proprietary) header to two files
  copyrightify src/main.c scripts/build.sh

  # Add a BSD header to every supported file under src/
  copyrightify --recursive --license bsd src/

  # Preview the changes without touching any file
  copyrightify --dry-run --show-diff -r src/

  # Run without a git config
  copyrightify --name 'Jane Doe' --email jane@example.com --organization 'Example Corp' src/
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  /// Files or directories to process
  #[arg(required_unless_present = "list_licenses", value_name = "PATH")]
  pub paths: Vec<PathBuf>,

  /// Descend into subdirectories of directory arguments
  #[arg(short, long)]
  pub recursive: bool,

  /// License to apply (see --list-licenses)
  #[arg(short, long, default_value = "proprietary", value_name = "LICENSE")]
  pub license: String,

  /// Print the licenses available in the active configuration and exit
  #[arg(long)]
  pub list_licenses: bool,

  /// Configuration file replacing the bundled one (env: COPYRIGHTIFY_CONFIG)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Git configuration file to read the identity from (default: ~/.gitconfig)
  #[arg(long, value_name = "FILE")]
  pub git_config: Option<PathBuf>,

  /// Author name (overrides user.name)
  #[arg(long)]
  pub name: Option<String>,

  /// Author email (overrides user.email)
  #[arg(long)]
  pub email: Option<String>,

  /// Organization (overrides user.organization)
  #[arg(long)]
  pub organization: Option<String>,

  /// Copyright year (default: current year)
  #[arg(long)]
  pub year: Option<i32>,

  /// Build the new contents without modifying any file
  #[arg(long)]
  pub dry_run: bool,

  /// Show a diff of each change in dry run mode
  #[arg(long, requires = "dry_run")]
  pub show_diff: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Arguments that were not recognised and have been dropped
  #[arg(skip)]
  pub ignored_args: Vec<String>,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::try_parse_known_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
  }

  /// Parses `args`, dropping each unknown argument and retrying.
  ///
  /// The dropped tokens are recorded in [`Cli::ignored_args`]. Any other
  /// parse error (including `--help` and `--version`) is returned as is.
  pub fn try_parse_known_from<I, T>(args: I) -> Result<Self, clap::Error>
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
  {
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let mut ignored = Vec::new();

    loop {
      let err = match Self::try_parse_from(args.clone()) {
        Ok(mut cli) => {
          cli.ignored_args = ignored;
          return Ok(cli);
        }
        Err(err) => err,
      };

      if err.kind() != ErrorKind::UnknownArgument {
        return Err(err);
      }
      let Some(ContextValue::String(invalid)) = err.get(ContextKind::InvalidArg) else {
        return Err(err);
      };
      let Some(dropped) = drop_unknown(&mut args, invalid) else {
        return Err(err);
      };
      ignored.push(dropped);
    }
  }
}

/// Removes the argument clap reported as unknown from `args`.
///
/// A whole token (`--flag` or `--flag=value`) is removed as is. An unknown
/// short flag inside a cluster such as `-rz` is cut out of the cluster, and
/// the rest of the cluster is kept. Returns the dropped text.
fn drop_unknown(args: &mut Vec<OsString>, invalid: &str) -> Option<String> {
  if let Some(position) = find_token(args, invalid) {
    let removed = args.remove(position);
    return Some(removed.to_string_lossy().into_owned());
  }

  let flag = invalid.strip_prefix('-').filter(|f| f.chars().count() == 1)?;
  let position = args.iter().skip(1).position(|arg| {
    arg
      .to_str()
      .is_some_and(|a| a.starts_with('-') && !a.starts_with("--") && a[1..].contains(flag))
  })? + 1;

  let cluster = args[position].to_str()?.to_string();
  let offset = cluster[1..].find(flag)? + 1;
  let rest = format!("{}{}", &cluster[..offset], &cluster[offset + flag.len()..]);
  if rest == "-" {
    args.remove(position);
  } else {
    args[position] = OsString::from(rest);
  }
  Some(invalid.to_string())
}

/// Index of the token clap reported as unknown, skipping the binary name.
fn find_token(args: &[OsString], invalid: &str) -> Option<usize> {
  let with_value = format!("{invalid}=");
  args
    .iter()
    .enumerate()
    .skip(1)
    .find(|(_, arg)| arg.to_str().is_some_and(|a| a == invalid || a.starts_with(&with_value)))
    .map(|(index, _)| index)
}

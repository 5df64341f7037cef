//! # Logging Module
//!
//! Process-wide output settings for copyrightify:
//! - the output mode chosen by `-q`/`-v`, consulted by every printer
//! - the colour mode chosen by `--colors`
//! - the `tracing` subscriber for internal diagnostics
//!
//! Per-file results belong to [`crate::output`]; this module only holds the
//! switches and two small macros for ad-hoc messages.
//!
//! ## Example
//!
//! ```rust
//! use copyrightify::logging::{ColorMode, set_verbose};
//! use copyrightify::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! // stderr, only with -v
//! verbose_log!("Loading config from: {}", "copyrightify.toml");
//!
//! // stdout, hidden by -q
//! info_log!("Dry run: no files will be modified");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Prints to stderr when verbose mode is on. Same syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints a highlighted notice to stdout unless quiet mode is on.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

#[doc(hidden)]
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}

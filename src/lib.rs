//! # copyrightify
//!
//! A tool that adds copyright/license headers to source files that lack one.
//!
//! `copyrightify` picks the comment syntax from the file's extension or its
//! interpreter directive (`#!/usr/bin/env python`, `<?xml ...?>`), keeps that
//! directive on the first line, and never adds a second header to a file that
//! already carries one.
//!
//! ## Features
//!
//! * Line-comment and block-comment file types, configured in TOML
//! * Author identity read from the user's git configuration
//! * Idempotent: a file that already mentions the copyright marker near its
//!   top is left untouched
//! * Atomic rewrites that keep the original file's permissions
//! * Dry-run mode with diffs
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use copyrightify::config::Config;
//! use copyrightify::identity::Identity;
//! use copyrightify::processor::{Processor, ProcessorOptions};
//! use copyrightify::templates::RenderContext;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::bundled()?;
//!     let identity = Identity {
//!         name: "Jane Doe".to_string(),
//!         email: "jane@example.com".to_string(),
//!         organization: "Example Corp".to_string(),
//!     };
//!     let context = RenderContext::new(identity, 2025, "bsd".to_string());
//!
//!     let processor = Processor::new(&config, context, ProcessorOptions::default())?;
//!     for report in processor.process(&[PathBuf::from("src")], true) {
//!         println!("{}: {}", report.path.display(), report.outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Walking input paths and rewriting files
//! * [`templates`] - Header templates and rendering
//! * [`config`] - Configuration loading and validation
//! * [`logging`] - Output modes and tracing setup

pub mod config;
pub mod diff;
pub mod file_type;
pub mod header_guard;
pub mod identity;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod shebang;
pub mod templates;

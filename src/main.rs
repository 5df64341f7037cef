//! # copyrightify
//!
//! Adds copyright headers to source files that lack one.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run(cli)
}

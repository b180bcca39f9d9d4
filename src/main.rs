//! # Sharables CLI
//!
//! This is the binary entry point for the `sharables` command-line tool.
//!
//! It parses arguments with `clap` and dispatches to the command modules.
//! All deployment and git logic lives in the `sharables` library crate;
//! errors returned from a command are printed by `anyhow` and exit with
//! status 1.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}

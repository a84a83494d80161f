//! texcat - Concatenate a LaTeX source tree into one text artifact
//!
//! texcat provides:
//! - Entry document selection for arbitrary source trees
//! - `\input`/`\include` resolution with cycle-safe traversal
//! - Delimited concatenation into a single artifact (cat.txt)
//! - Keyed caching of produced artifacts

use anyhow::Result;
use clap::Parser;

mod cache;
mod cli;
mod core;
mod tex;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    core::logging::init(cli.quiet, cli.verbose);
    cli::run(cli)
}

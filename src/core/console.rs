//! Human-readable progress on stderr
//!
//! Stdout carries rendered results (or the artifact itself), so everything
//! meant for a person reading the terminal goes through here.

use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct Console {
    enabled: bool,
}

impl Console {
    pub fn new(quiet: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { enabled: !quiet }
    }

    pub fn root_document(&self, path: &Path, tier: &str) {
        if self.enabled {
            eprintln!(
                "{} {} {}",
                "Root document:".green().bold(),
                path.display(),
                format!("({})", tier).dimmed()
            );
        }
    }

    pub fn include_order(&self, files: &[PathBuf]) {
        if self.enabled {
            eprintln!("{}", "Files to be concatenated in order:".bold());
            for file in files {
                eprintln!("  {}", file.display());
            }
        }
    }

    pub fn artifact(&self, path: &Path, reused: bool) {
        if self.enabled {
            let label = if reused {
                "Reusing cached artifact:".yellow().bold()
            } else {
                "Concatenated into:".green().bold()
            };
            eprintln!("{} {}", label, path.display());
        }
    }
}

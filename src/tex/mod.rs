//! LaTeX include engine
//!
//! Provides:
//! - root: entry document selection
//! - directives: `\input`/`\include` extraction
//! - resolve: reference to file resolution
//! - walk: cycle-safe include order traversal
//! - emit: delimited concatenation output
//! - api: command handlers

pub mod api;
pub mod config;
pub mod directives;
pub mod emit;
pub mod resolve;
pub mod root;
pub mod walk;

//! Core module - Shared plumbing for every command
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - Lenient file reading
//! - Error taxonomy, logging setup and stderr progress output

pub mod console;
pub mod error;
pub mod file_reader;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;

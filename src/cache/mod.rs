//! Cache module - Keyed reuse of concatenated artifacts
//!
//! Provides:
//! - Cache entries (cat.txt + meta.json per key)
//! - Cache metadata and validity checks

pub mod meta;
pub mod store;

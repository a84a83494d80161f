//! Reference resolution
//!
//! A reference without the canonical extension is tried as `ref.tex` first
//! and then verbatim; a reference that already ends in `.tex` is only tried
//! verbatim. Candidates are joined onto the including file's directory. A
//! reference that matches no regular file is dropped without error.

use std::path::{Path, PathBuf};

use crate::core::paths::has_extension;

/// Candidate paths for a reference, in the order they are tried
pub fn candidate_paths(reference: &str, base_dir: &Path, extension: &str) -> Vec<PathBuf> {
    if has_extension(reference, extension) {
        vec![base_dir.join(reference)]
    } else {
        vec![
            base_dir.join(format!("{}.{}", reference, extension)),
            base_dir.join(reference),
        ]
    }
}

/// First candidate that exists as a regular file, if any
pub fn resolve_reference(reference: &str, base_dir: &Path, extension: &str) -> Option<PathBuf> {
    candidate_paths(reference, base_dir, extension)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

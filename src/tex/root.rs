//! Entry document selection
//!
//! Source trees arrive in every shape imaginable, so the entry document is
//! picked by a tiered policy: the conventional `main.tex` name first, then the
//! first file holding `\begin{document}`, then whatever candidate came first.
//!
//! Enumeration visits the files of a directory (sorted by name) before
//! descending into its subdirectories (also sorted by name). This keeps the
//! order deterministic for a given tree, independent of the filesystem's own
//! directory ordering.
//!
//! A subdirectory that cannot be listed is skipped with a warning; only an
//! unreadable top-level directory fails the selection.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{TexError, TexResult};
use crate::core::file_reader::read_text_lossy;
use crate::core::model::Confidence;
use crate::core::paths::has_extension;
use crate::tex::config::TexConfig;

/// Which tier of the policy produced the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// Base name matched the conventional entry name
    EntryName,
    /// Content contained the document-start marker
    DocumentMarker,
    /// First enumerated candidate
    Fallback,
}

impl SelectionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionTier::EntryName => "entry_name",
            SelectionTier::DocumentMarker => "document_marker",
            SelectionTier::Fallback => "fallback",
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            SelectionTier::EntryName => Confidence::High,
            SelectionTier::DocumentMarker => Confidence::Medium,
            SelectionTier::Fallback => Confidence::Low,
        }
    }
}

/// The chosen entry document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSelection {
    pub path: PathBuf,
    pub tier: SelectionTier,
    /// Size of the candidate set the choice was made from
    pub candidates: usize,
}

/// Files of a directory before its subdirectories, each group by name
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// File name for matching; names that are not valid UTF-8 still match on
/// their lossy form
fn file_name_of(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// Recursively enumerate every file carrying the canonical extension
pub fn collect_candidates(dir: &Path, config: &TexConfig) -> TexResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TexError::MissingDirectory(dir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(dir).sort_by(files_first) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if !is_regular_file(&entry) {
            continue;
        }
        if has_extension(&file_name_of(&entry), &config.extension) {
            candidates.push(entry.into_path());
        }
    }

    Ok(candidates)
}

/// Pick the entry document under `dir`; `Ok(None)` when no candidate exists
pub fn select_root(dir: &Path, config: &TexConfig) -> TexResult<Option<RootSelection>> {
    let candidates = collect_candidates(dir, config)?;
    let total = candidates.len();
    tracing::debug!(dir = %dir.display(), candidates = total, "enumerated candidates");

    let entry_file_name = config.entry_file_name();
    let conventional = candidates.iter().find(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().eq_ignore_ascii_case(&entry_file_name))
            .unwrap_or(false)
    });
    if let Some(path) = conventional {
        return Ok(Some(RootSelection {
            path: path.clone(),
            tier: SelectionTier::EntryName,
            candidates: total,
        }));
    }

    for path in &candidates {
        let text = read_text_lossy(path)?;
        if text.content.contains(&config.document_marker) {
            return Ok(Some(RootSelection {
                path: path.clone(),
                tier: SelectionTier::DocumentMarker,
                candidates: total,
            }));
        }
    }

    Ok(candidates.into_iter().next().map(|path| RootSelection {
        path,
        tier: SelectionTier::Fallback,
        candidates: total,
    }))
}

/// Like [`select_root`] but treats an empty candidate set as an error
pub fn require_root(dir: &Path, config: &TexConfig) -> TexResult<RootSelection> {
    select_root(dir, config)?.ok_or_else(|| TexError::NoEntryDocument(dir.to_path_buf()))
}

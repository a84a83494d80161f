//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::core::util::hash_bytes;

/// Canonical extension of LaTeX sources (without the dot)
pub const TEX_EXTENSION: &str = "tex";

/// Base name of the conventional entry document
pub const DEFAULT_ENTRY_NAME: &str = "main";

/// Literal whose presence marks a file as a document body
pub const DOCUMENT_START_MARKER: &str = r"\begin{document}";

/// Conventional file name of the concatenated artifact
pub const DEFAULT_ARTIFACT_NAME: &str = "cat.txt";

/// Knobs for root selection, resolution and emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexConfig {
    /// Canonical extension, compared case-insensitively
    pub extension: String,

    /// Entry-point base name, compared case-insensitively
    pub entry_name: String,

    pub document_marker: String,

    pub artifact_name: String,
}

impl Default for TexConfig {
    fn default() -> Self {
        Self {
            extension: TEX_EXTENSION.to_string(),
            entry_name: DEFAULT_ENTRY_NAME.to_string(),
            document_marker: DOCUMENT_START_MARKER.to_string(),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
        }
    }
}

impl TexConfig {
    /// Override the entry-point base name
    pub fn with_entry_name(mut self, entry_name: impl Into<String>) -> Self {
        self.entry_name = entry_name.into();
        self
    }

    /// Full file name of the conventional entry document, e.g. `main.tex`
    pub fn entry_file_name(&self) -> String {
        format!("{}.{}", self.entry_name, self.extension)
    }

    /// Hash of the serialized policy; cache entries built under another
    /// policy are stale
    pub fn policy_hash(&self) -> String {
        let serialized = serde_json::to_vec(self).unwrap_or_default();
        hash_bytes(&serialized)
    }
}

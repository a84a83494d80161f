//! Error taxonomy for the include engine
//!
//! Only genuine failures live here. Dangling references, include cycles and
//! invalid UTF-8 are handled leniently by the engine and never surface.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::model::TexcatError;

#[derive(Debug, Error)]
pub enum TexError {
    /// The directory handed to the root selector does not exist
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// No candidate `.tex` file exists anywhere under the directory
    #[error("no entry document found under {}", .0.display())]
    NoEntryDocument(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The artifact path names one of the files being concatenated
    #[error("refusing to overwrite input file {}", .0.display())]
    OutputIsInput(PathBuf),

    /// Writing the concatenated stream to its sink failed
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl TexError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TexError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TexError::Write {
            path: path.into(),
            source,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            TexError::MissingDirectory(_) => "MISSING_DIRECTORY",
            TexError::NoEntryDocument(_) => "NO_ENTRY_DOCUMENT",
            TexError::Read { .. } => "READ_FAILED",
            TexError::Walk(_) => "WALK_FAILED",
            TexError::OutputIsInput(_) => "OUTPUT_IS_INPUT",
            TexError::Write { .. } | TexError::Output(_) => "WRITE_FAILED",
        }
    }

    /// Convert to the error payload embedded in result items
    pub fn to_item_error(&self) -> TexcatError {
        TexcatError::new(self.code(), self.to_string())
    }
}

pub type TexResult<T> = std::result::Result<T, TexError>;

//! Lenient text reading
//!
//! Source trees come from arbitrary authors and editors, so content is decoded
//! as UTF-8 with invalid sequences replaced. I/O failures are still errors.

use std::fs;
use std::path::Path;

use crate::core::error::{TexError, TexResult};

/// Result of reading a file as text
#[derive(Debug, Clone)]
pub struct TextRead {
    /// Decoded content
    pub content: String,

    /// Whether lossy conversion replaced invalid bytes
    pub lossy: bool,

    /// Size on disk in bytes
    pub size: u64,
}

/// Decode bytes as UTF-8, replacing invalid sequences
pub fn decode_lossy(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(content) => (content, false),
        Err(err) => {
            let bytes = err.into_bytes();
            (String::from_utf8_lossy(&bytes).into_owned(), true)
        }
    }
}

/// Read the whole file, decoding leniently
pub fn read_text_lossy(path: &Path) -> TexResult<TextRead> {
    let bytes = fs::read(path).map_err(|e| TexError::read(path, e))?;
    let size = bytes.len() as u64;
    let (content, lossy) = decode_lossy(bytes);

    if lossy {
        tracing::warn!(
            path = %path.display(),
            "lossy UTF-8 conversion applied (invalid bytes replaced)"
        );
    }

    Ok(TextRead {
        content,
        lossy,
        size,
    })
}

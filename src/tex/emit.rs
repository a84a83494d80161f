//! Concatenation output
//!
//! Each file becomes one block:
//!
//! ```text
//! % >>>>>>>> BEGIN /abs/path/main.tex
//! <file content>
//! % <<<<<<<< END /abs/path/main.tex
//!
//! ```
//!
//! Blocks follow include order. The markers are `%` comments, so the artifact
//! is itself readable as LaTeX. Downstream tooling splits on these exact
//! lines; changing them is a breaking change.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::Xxh3;

use crate::core::error::{TexError, TexResult};
use crate::core::file_reader::read_text_lossy;

pub const BEGIN_MARKER: &str = "% >>>>>>>> BEGIN";
pub const END_MARKER: &str = "% <<<<<<<< END";

/// What was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub files: usize,
    pub bytes: u64,
    /// XXH3 of the emitted stream
    pub hash: String,
    /// Files whose content needed lossy decoding
    pub lossy_files: usize,
}

/// Render one delimited block
pub fn format_block(path: &Path, content: &str) -> String {
    let path = path.display();
    format!("{BEGIN_MARKER} {path}\n{content}\n{END_MARKER} {path}\n\n")
}

/// Stream the delimited concatenation of `paths` into `writer`
pub fn emit_concatenation<W: Write>(paths: &[PathBuf], writer: &mut W) -> TexResult<EmitSummary> {
    let mut hasher = Xxh3::new();
    let mut bytes = 0u64;
    let mut lossy_files = 0;

    for path in paths {
        let text = read_text_lossy(path)?;
        if text.lossy {
            lossy_files += 1;
        }

        let block = format_block(path, &text.content);
        writer
            .write_all(block.as_bytes())
            .map_err(TexError::Output)?;
        hasher.update(block.as_bytes());
        bytes += block.len() as u64;
    }
    writer.flush().map_err(TexError::Output)?;

    Ok(EmitSummary {
        files: paths.len(),
        bytes,
        hash: format!("{:016x}", hasher.digest()),
        lossy_files,
    })
}

/// Persist the concatenation to `output`, creating parent directories
///
/// Fails before touching anything when `output` is itself one of `paths`.
pub fn write_artifact(output: &Path, paths: &[PathBuf]) -> TexResult<EmitSummary> {
    if let Ok(existing) = fs::canonicalize(output) {
        if paths.iter().any(|path| fs::canonicalize(path).ok().as_ref() == Some(&existing)) {
            return Err(TexError::OutputIsInput(existing));
        }
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| TexError::write(parent, e))?;
    }
    let file = File::create(output).map_err(|e| TexError::write(output, e))?;
    let mut writer = BufWriter::new(file);
    let summary = emit_concatenation(paths, &mut writer)?;
    tracing::info!(
        output = %output.display(),
        files = summary.files,
        bytes = summary.bytes,
        "artifact written"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::util::hash_bytes;
    use tempfile::tempdir;

    fn concatenate(paths: &[PathBuf]) -> TexResult<Vec<u8>> {
        let mut buffer = Vec::new();
        emit_concatenation(paths, &mut buffer)?;
        Ok(buffer)
    }

    #[test]
    fn test_format_block() {
        let block = format_block(Path::new("/p/a.tex"), "body");
        assert_eq!(
            block,
            "% >>>>>>>> BEGIN /p/a.tex\nbody\n% <<<<<<<< END /p/a.tex\n\n"
        );
    }

    #[test]
    fn test_blocks_in_list_order() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.tex");
        let b = temp.path().join("b.tex");
        fs::write(&a, "first\n").unwrap();
        fs::write(&b, "second").unwrap();

        let output = String::from_utf8(concatenate(&[b.clone(), a.clone()]).unwrap()).unwrap();
        let expected = format!(
            "% >>>>>>>> BEGIN {b}\nsecond\n% <<<<<<<< END {b}\n\n\
             % >>>>>>>> BEGIN {a}\nfirst\n\n% <<<<<<<< END {a}\n\n",
            a = a.display(),
            b = b.display()
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn test_empty_list_emits_nothing() {
        let mut buffer = Vec::new();
        let summary = emit_concatenation(&[], &mut buffer).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(summary.files, 0);
        assert_eq!(summary.bytes, 0);
    }

    #[test]
    fn test_summary_matches_stream() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.tex");
        fs::write(&a, b"caf\xe9").unwrap();

        let mut buffer = Vec::new();
        let summary = emit_concatenation(&[a], &mut buffer).unwrap();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.bytes, buffer.len() as u64);
        assert_eq!(summary.hash, hash_bytes(&buffer));
        assert_eq!(summary.lossy_files, 1);
        assert!(String::from_utf8(buffer).unwrap().contains('\u{FFFD}'));
    }

    #[test]
    fn test_write_artifact_creates_parents() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.tex");
        fs::write(&a, "x").unwrap();
        let output = temp.path().join("out/nested/cat.txt");

        let summary = write_artifact(&output, &[a.clone()]).unwrap();
        let written = fs::read(&output).unwrap();
        assert_eq!(written, concatenate(&[a]).unwrap());
        assert_eq!(summary.bytes, written.len() as u64);
    }

    #[test]
    fn test_write_artifact_refuses_to_overwrite_input() {
        let temp = tempdir().unwrap();
        let main = temp.path().join("main.tex");
        let a = temp.path().join("a.tex");
        fs::write(&main, "\\input{a}").unwrap();
        fs::write(&a, "leaf").unwrap();

        let err = write_artifact(&temp.path().join("./main.tex"), &[main.clone(), a]).unwrap_err();
        assert_eq!(err.code(), "OUTPUT_IS_INPUT");
        assert_eq!(fs::read_to_string(&main).unwrap(), "\\input{a}");
    }

    #[test]
    fn test_write_artifact_replaces_previous_artifact() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a.tex");
        fs::write(&a, "x").unwrap();
        let output = temp.path().join("cat.txt");
        fs::write(&output, "stale").unwrap();

        write_artifact(&output, &[a.clone()]).unwrap();
        assert_eq!(fs::read(&output).unwrap(), concatenate(&[a]).unwrap());
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let temp = tempdir().unwrap();
        let err = concatenate(&[temp.path().join("gone.tex")]).unwrap_err();
        assert_eq!(err.code(), "READ_FAILED");
    }
}

//! Unified Result Model
//!
//! Every command maps its output to this model before rendering.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Root,
    File,
    Reference,
    Artifact,
    Error,
}

/// Confidence level of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Source mode indicating how the result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Scan,
    Parse,
    Walk,
    Emit,
    Cache,
}

/// Line-based range (1-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub fn line(line: u32) -> Self {
        Range {
            start: line,
            end: line,
        }
    }
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,

    /// File size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether invalid UTF-8 was replaced while reading
    #[serde(default)]
    pub lossy: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TexcatError {
    pub code: String,
    pub message: String,
}

impl TexcatError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (selection tier, include position, resolution...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    pub confidence: Confidence,

    pub source_mode: SourceMode,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TexcatError>,
}

impl ResultItem {
    fn base(kind: Kind, path: Option<String>, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path,
            range: None,
            excerpt: None,
            data: None,
            confidence: Confidence::High,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create the selected entry document result
    pub fn root(path: impl Into<String>, confidence: Confidence) -> Self {
        Self::base(Kind::Root, Some(path.into()), SourceMode::Scan).with_confidence(confidence)
    }

    /// Create a result for one file in include order
    pub fn file(path: impl Into<String>) -> Self {
        Self::base(Kind::File, Some(path.into()), SourceMode::Walk)
    }

    /// Create a result for one inclusion directive
    pub fn reference(path: impl Into<String>, range: Range, raw: impl Into<String>) -> Self {
        let mut item = Self::base(Kind::Reference, Some(path.into()), SourceMode::Parse);
        item.range = Some(range);
        item.excerpt = Some(raw.into());
        item
    }

    /// Create a result describing a written artifact
    pub fn artifact(path: impl Into<String>, source_mode: SourceMode) -> Self {
        Self::base(Kind::Artifact, Some(path.into()), source_mode)
    }

    /// Create a new error result
    pub fn error(error: TexcatError) -> Self {
        let mut item = Self::base(Kind::Error, None, SourceMode::Scan);
        item.errors.push(error);
        item
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
///
/// Order is meaningful: include order for `files`, directive order for `refs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }
}

//! Cache metadata management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cache format version
pub const CACHE_VERSION: &str = "1";

/// Metadata stored next to a cached artifact as `meta.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub cache_version: String,

    /// Caller-supplied identifier of the source tree
    pub key: String,

    /// Directory the source tree was read from
    pub root: String,

    /// Entry document the walk started from
    pub root_document: String,

    /// Concatenated files in include order
    pub files: Vec<String>,

    /// Hash of the engine policy the artifact was produced under
    pub policy_hash: String,

    /// XXH3 of the artifact bytes
    pub hash: String,

    pub bytes: u64,

    pub generated_at: DateTime<Utc>,
}

impl CacheMeta {
    pub fn is_current(&self, policy_hash: &str) -> bool {
        self.cache_version == CACHE_VERSION && self.policy_hash == policy_hash
    }
}

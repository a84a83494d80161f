//! Keyed artifact cache
//!
//! Wraps the resolve-and-emit pipeline: when a valid entry exists for a key,
//! the pipeline does not run at all. The engine itself never looks here.
//!
//! Layout: `<cache-dir>/<key>/cat.txt` and `<cache-dir>/<key>/meta.json`.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::meta::{CacheMeta, CACHE_VERSION};
use crate::core::error::TexResult;
use crate::core::paths::normalize_path;
use crate::tex::config::TexConfig;
use crate::tex::emit::write_artifact;

pub const META_FILE: &str = "meta.json";

/// What the wrapped pipeline produced
#[derive(Debug, Clone)]
pub struct Produced {
    pub root_document: PathBuf,
    pub files: Vec<PathBuf>,
}

/// A cached artifact, fresh or reused
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub path: PathBuf,
    pub meta: CacheMeta,
    /// True when the entry was reused without running the pipeline
    pub hit: bool,
}

/// Reduce a key to one safe path component
///
/// Only the last `/`-separated segment is kept, so a source URL such as
/// `https://arxiv.org/e-print/2401.12345` keys as `2401.12345`.
pub fn sanitize_key(key: &str) -> Result<String> {
    let segment = key.trim().trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        bail!("Invalid cache key: {:?}", key);
    }
    Ok(segment.to_string())
}

pub fn entry_dir(cache_dir: &Path, key: &str) -> Result<PathBuf> {
    Ok(cache_dir.join(sanitize_key(key)?))
}

pub fn write_meta(entry: &Path, meta: &CacheMeta) -> Result<()> {
    let file_path = entry.join(META_FILE);
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(&file_path, json)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;
    Ok(())
}

pub fn read_meta(entry: &Path) -> Result<CacheMeta> {
    let file_path = entry.join(META_FILE);
    let content = fs::read_to_string(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let meta: CacheMeta = serde_json::from_str(&content)?;
    Ok(meta)
}

/// Valid when meta parses, matches version and policy, and the artifact exists
pub fn read_valid_entry(entry: &Path, config: &TexConfig) -> Option<CacheMeta> {
    let meta = read_meta(entry).ok()?;
    if !meta.is_current(&config.policy_hash()) {
        return None;
    }
    entry.join(&config.artifact_name).is_file().then_some(meta)
}

/// Return the cached artifact for `key`, running `produce` only on a miss
pub fn cached_concat<F>(
    cache_dir: &Path,
    key: &str,
    root: &Path,
    config: &TexConfig,
    force: bool,
    produce: F,
) -> Result<CachedArtifact>
where
    F: FnOnce() -> TexResult<Produced>,
{
    let entry = entry_dir(cache_dir, key)?;
    let artifact = entry.join(&config.artifact_name);

    if !force {
        if let Some(meta) = read_valid_entry(&entry, config) {
            tracing::info!(entry = %entry.display(), "cache hit");
            return Ok(CachedArtifact {
                path: artifact,
                meta,
                hit: true,
            });
        }
    }

    let produced = produce()?;
    fs::create_dir_all(&entry)
        .with_context(|| format!("Failed to create cache entry {}", entry.display()))?;

    // stale meta must not vouch for a half-written artifact
    let _ = fs::remove_file(entry.join(META_FILE));
    let summary = write_artifact(&artifact, &produced.files)?;

    let meta = CacheMeta {
        cache_version: CACHE_VERSION.to_string(),
        key: sanitize_key(key)?,
        root: normalize_path(root),
        root_document: normalize_path(&produced.root_document),
        files: produced.files.iter().map(|p| normalize_path(p)).collect(),
        policy_hash: config.policy_hash(),
        hash: summary.hash,
        bytes: summary.bytes,
        generated_at: Utc::now(),
    };
    write_meta(&entry, &meta)?;

    Ok(CachedArtifact {
        path: artifact,
        meta,
        hit: false,
    })
}

/// Remove the entry for `key`, if present
pub fn clear_entry(cache_dir: &Path, key: &str) -> Result<bool> {
    let entry = entry_dir(cache_dir, key)?;
    if !entry.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&entry)
        .with_context(|| format!("Failed to remove cache entry {}", entry.display()))?;
    Ok(true)
}

//! Command handlers
//!
//! Map engine output onto the unified result model and render it.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cache::store::{cached_concat, clear_entry, entry_dir, Produced};
use crate::core::console::Console;
use crate::core::error::TexResult;
use crate::core::file_reader::read_text_lossy;
use crate::core::model::{Meta, Range, ResultItem, ResultSet, SourceMode};
use crate::core::paths::{display_path, resolve_against};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::file_meta;
use crate::tex::config::TexConfig;
use crate::tex::directives::parse_directives;
use crate::tex::emit::{emit_concatenation, write_artifact};
use crate::tex::resolve::resolve_reference;
use crate::tex::root::{require_root, RootSelection};
use crate::tex::walk::{resolve_include_order, walk_includes};

/// Options for the concat command
#[derive(Debug, Clone, Default)]
pub struct ConcatOptions {
    /// Start the walk here instead of the selected root
    pub entry: Option<PathBuf>,
    /// Artifact location (defaults to `ROOT/cat.txt`)
    pub output: Option<PathBuf>,
    /// Stream the artifact to stdout instead of writing a file
    pub stdout: bool,
    pub cache_key: Option<String>,
    pub cache_dir: PathBuf,
    pub force: bool,
}

/// Where the walk starts
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    /// Present when the entry came from root selection
    pub selection: Option<RootSelection>,
}

/// Use the explicit entry file, or run root selection on `root`
pub fn pick_entry(root: &Path, entry: Option<&Path>, config: &TexConfig) -> TexResult<Entry> {
    match entry {
        Some(path) => Ok(Entry {
            path: resolve_against(root, path),
            selection: None,
        }),
        None => {
            let selection = require_root(root, config)?;
            tracing::info!(
                path = %selection.path.display(),
                tier = selection.tier.as_str(),
                "selected entry document"
            );
            Ok(Entry {
                path: selection.path.clone(),
                selection: Some(selection),
            })
        }
    }
}

/// Result item for a root selection
pub fn root_item(selection: &RootSelection, root: &Path) -> ResultItem {
    ResultItem::root(
        display_path(&selection.path, root),
        selection.tier.confidence(),
    )
    .with_meta(file_meta(&selection.path))
    .with_data(json!({
        "selected_by": selection.tier.as_str(),
        "candidates": selection.candidates,
    }))
}

/// Select the entry document under `root`
pub fn root_result_set(root: &Path, config: &TexConfig) -> Result<ResultSet> {
    let selection = require_root(root, config)?;
    let mut result_set = ResultSet::new();
    result_set.push(root_item(&selection, root));
    Ok(result_set)
}

/// Files in include order, one item each
pub fn files_result_set(root: &Path, entry: Option<&Path>, config: &TexConfig) -> Result<ResultSet> {
    let entry = pick_entry(root, entry, config)?;
    let nodes = walk_includes(&entry.path, config)?;

    let mut result_set = ResultSet::new();
    for (position, node) in nodes.iter().enumerate() {
        let meta = Meta {
            size: Some(node.size),
            hash: Some(node.hash.clone()),
            lossy: node.lossy,
            ..file_meta(&node.path)
        };

        let item = ResultItem::file(display_path(&node.path, root))
            .with_meta(meta)
            .with_data(json!({
                "position": position,
                "depth": node.depth,
                "included_from": node.included_from.as_deref().map(|p| display_path(p, root)),
                "references": node.references,
            }));
        result_set.push(item);
    }
    Ok(result_set)
}

/// Directives of a single file with their resolution
pub fn refs_result_set(root: &Path, file: &Path, config: &TexConfig) -> Result<ResultSet> {
    let path = resolve_against(root, file);
    let text = read_text_lossy(&path)?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let relative = display_path(&path, root);

    let mut result_set = ResultSet::new();
    for directive in parse_directives(&text.content) {
        let resolved = resolve_reference(&directive.reference, &base_dir, &config.extension)
            .map(|p| display_path(&p, root));
        let item = ResultItem::reference(
            relative.clone(),
            Range::line(directive.line),
            directive.reference,
        )
        .with_data(json!({
            "form": directive.form.as_str(),
            "resolved": resolved,
        }));
        result_set.push(item);
    }
    Ok(result_set)
}

fn print_result_set(result_set: &ResultSet, render_config: RenderConfig) -> Result<()> {
    let renderer = Renderer::with_config(render_config);
    renderer
        .render_to(result_set, io::stdout().lock())
        .context("Failed to write results")
}

pub fn run_root(root: &Path, config: &TexConfig, render_config: RenderConfig) -> Result<()> {
    let result_set = root_result_set(root, config)?;
    print_result_set(&result_set, render_config)
}

pub fn run_files(
    root: &Path,
    entry: Option<&Path>,
    config: &TexConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = files_result_set(root, entry, config)?;
    print_result_set(&result_set, render_config)
}

pub fn run_refs(
    root: &Path,
    file: &Path,
    config: &TexConfig,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = refs_result_set(root, file, config)?;
    print_result_set(&result_set, render_config)
}

/// Resolve the include order, reporting progress on the console
fn produce(
    root: &Path,
    entry: Option<&Path>,
    config: &TexConfig,
    console: Console,
) -> TexResult<Produced> {
    let entry = pick_entry(root, entry, config)?;
    if let Some(selection) = &entry.selection {
        console.root_document(&selection.path, selection.tier.as_str());
    }
    let files = resolve_include_order(&entry.path, config)?;
    console.include_order(&files);
    Ok(Produced {
        root_document: entry.path,
        files,
    })
}

/// Resolve, concatenate, and persist (or stream) the artifact
pub fn run_concat(
    root: &Path,
    options: &ConcatOptions,
    config: &TexConfig,
    render_config: RenderConfig,
    console: Console,
) -> Result<()> {
    if let Some(key) = &options.cache_key {
        let cache_dir = resolve_against(root, &options.cache_dir);
        let cached = cached_concat(&cache_dir, key, root, config, options.force, || {
            produce(root, options.entry.as_deref(), config, console)
        })?;

        if options.stdout {
            let mut file = File::open(&cached.path)
                .with_context(|| format!("Failed to open {}", cached.path.display()))?;
            let mut stdout = io::stdout().lock();
            io::copy(&mut file, &mut stdout).context("Failed to write artifact")?;
            stdout.flush()?;
            return Ok(());
        }

        console.artifact(&cached.path, cached.hit);
        let source_mode = if cached.hit {
            SourceMode::Cache
        } else {
            SourceMode::Emit
        };
        let item = ResultItem::artifact(display_path(&cached.path, root), source_mode)
            .with_meta(Meta {
                size: Some(cached.meta.bytes),
                hash: Some(cached.meta.hash.clone()),
                ..file_meta(&cached.path)
            })
            .with_data(json!({
                "files": cached.meta.files.len(),
                "root_document": display_path(Path::new(&cached.meta.root_document), root),
                "cache": if cached.hit { "hit" } else { "miss" },
                "key": cached.meta.key,
            }));
        let mut result_set = ResultSet::new();
        result_set.push(item);
        return print_result_set(&result_set, render_config);
    }

    let produced = produce(root, options.entry.as_deref(), config, console)?;

    if options.stdout {
        let mut stdout = io::stdout().lock();
        emit_concatenation(&produced.files, &mut stdout)?;
        return Ok(());
    }

    let output = match &options.output {
        Some(path) => resolve_against(root, path),
        None => root.join(&config.artifact_name),
    };
    let summary = write_artifact(&output, &produced.files)?;
    console.artifact(&output, false);

    let item = ResultItem::artifact(display_path(&output, root), SourceMode::Emit)
        .with_meta(Meta {
            size: Some(summary.bytes),
            hash: Some(summary.hash.clone()),
            lossy: summary.lossy_files > 0,
            ..file_meta(&output)
        })
        .with_data(json!({
            "files": summary.files,
            "root_document": display_path(&produced.root_document, root),
            "lossy_files": summary.lossy_files,
        }));
    let mut result_set = ResultSet::new();
    result_set.push(item);
    print_result_set(&result_set, render_config)
}

/// Remove a cache entry and report whether anything was there
pub fn run_cache_clear(
    root: &Path,
    cache_dir: &Path,
    key: &str,
    render_config: RenderConfig,
) -> Result<()> {
    let cache_dir = resolve_against(root, cache_dir);
    let entry = entry_dir(&cache_dir, key)?;
    let removed = clear_entry(&cache_dir, key)?;

    let mut result_set = ResultSet::new();
    result_set.push(
        ResultItem::artifact(display_path(&entry, root), SourceMode::Cache)
            .with_data(json!({ "removed": removed })),
    );
    print_result_set(&result_set, render_config)
}

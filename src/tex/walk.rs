//! Include graph traversal
//!
//! Depth-first, pre-order walk over `\input`/`\include` edges starting at the
//! entry document. Uses an explicit stack so deep inclusion chains cannot
//! overflow the call stack. A path joins the visited set before its own
//! references are expanded, so self-inclusion and longer cycles terminate
//! without re-reading or re-emitting anything.
//!
//! Identity is the canonical path, but a file's references resolve against
//! the directory it was reached through. A symlinked `sections/intro.tex`
//! therefore includes its siblings from `sections/`, not from wherever the
//! link points.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{TexError, TexResult};
use crate::core::file_reader::read_text_lossy;
use crate::core::util::hash_bytes;
use crate::tex::config::TexConfig;
use crate::tex::directives::parse_references;
use crate::tex::resolve::resolve_reference;

/// A visited file in include order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    /// Absolute, canonical path
    pub path: PathBuf,

    /// File whose directive first reached this one (None for the entry)
    pub included_from: Option<PathBuf>,

    /// Distance from the entry document
    pub depth: usize,

    /// Raw references in order of appearance, duplicates kept
    pub references: Vec<String>,

    pub size: u64,

    /// XXH3 of the decoded content
    pub hash: String,

    pub lossy: bool,
}

struct Pending {
    path: PathBuf,
    /// Absolute, unresolved path the file was reached through
    reached_as: PathBuf,
    included_from: Option<PathBuf>,
    depth: usize,
}

fn canonical(path: &Path) -> TexResult<PathBuf> {
    fs::canonicalize(path).map_err(|e| TexError::read(path, e))
}

fn absolute(path: &Path) -> TexResult<PathBuf> {
    std::path::absolute(path).map_err(|e| TexError::read(path, e))
}

/// Stateful walker; the visited set persists across calls to [`walk`]
///
/// [`walk`]: IncludeWalker::walk
pub struct IncludeWalker<'a> {
    config: &'a TexConfig,
    visited: HashSet<PathBuf>,
}

impl<'a> IncludeWalker<'a> {
    pub fn new(config: &'a TexConfig) -> Self {
        Self {
            config,
            visited: HashSet::new(),
        }
    }

    /// Visit `root` and everything reachable from it that was not visited yet
    pub fn walk(&mut self, root: &Path) -> TexResult<Vec<DocumentNode>> {
        let mut order = Vec::new();
        let mut stack = vec![Pending {
            path: canonical(root)?,
            reached_as: absolute(root)?,
            included_from: None,
            depth: 0,
        }];

        while let Some(pending) = stack.pop() {
            if !self.visited.insert(pending.path.clone()) {
                tracing::trace!(path = %pending.path.display(), "already visited");
                continue;
            }

            let text = read_text_lossy(&pending.path)?;
            let references = parse_references(&text.content);
            let base_dir = pending
                .reached_as
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();

            tracing::debug!(
                path = %pending.path.display(),
                depth = pending.depth,
                references = references.len(),
                "visiting"
            );

            let mut children = Vec::new();
            for reference in &references {
                match resolve_reference(reference, &base_dir, &self.config.extension) {
                    Some(resolved) => children.push(Pending {
                        path: canonical(&resolved)?,
                        reached_as: resolved,
                        included_from: Some(pending.path.clone()),
                        depth: pending.depth + 1,
                    }),
                    None => tracing::debug!(
                        reference = reference.as_str(),
                        from = %pending.path.display(),
                        "unresolved reference skipped"
                    ),
                }
            }
            // reversed so the first reference is expanded first
            stack.extend(children.into_iter().rev());

            order.push(DocumentNode {
                hash: hash_bytes(text.content.as_bytes()),
                path: pending.path,
                included_from: pending.included_from,
                depth: pending.depth,
                references,
                size: text.size,
                lossy: text.lossy,
            });
        }

        Ok(order)
    }
}

/// Walk from `root` with a fresh visited set
pub fn walk_includes(root: &Path, config: &TexConfig) -> TexResult<Vec<DocumentNode>> {
    IncludeWalker::new(config).walk(root)
}

/// Ordered, duplicate-free list of files reachable from `root`, root first
pub fn resolve_include_order(root: &Path, config: &TexConfig) -> TexResult<Vec<PathBuf>> {
    Ok(walk_includes(root, config)?
        .into_iter()
        .map(|node| node.path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn names(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        let root = fs::canonicalize(root).unwrap();
        paths
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_cycle_through_two_files() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{a}");
        write(temp.path(), "a.tex", "\\input{b}");
        write(temp.path(), "b.tex", "\\input{a}");

        let order = resolve_include_order(&main, &TexConfig::default()).unwrap();
        assert_eq!(names(temp.path(), &order), vec!["main.tex", "a.tex", "b.tex"]);
    }

    #[test]
    fn test_self_inclusion_terminates() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{main}\n\\input{main.tex}");

        let order = resolve_include_order(&main, &TexConfig::default()).unwrap();
        assert_eq!(names(temp.path(), &order), vec!["main.tex"]);
    }

    #[test]
    fn test_pre_order_depth_first() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{a}\n\\input{d}");
        write(temp.path(), "a.tex", "\\input{b}\n\\input{c}");
        write(temp.path(), "b.tex", "leaf");
        write(temp.path(), "c.tex", "leaf");
        write(temp.path(), "d.tex", "\\input{b}");

        let nodes = walk_includes(&main, &TexConfig::default()).unwrap();
        let paths: Vec<PathBuf> = nodes.iter().map(|n| n.path.clone()).collect();
        assert_eq!(
            names(temp.path(), &paths),
            vec!["main.tex", "a.tex", "b.tex", "c.tex", "d.tex"]
        );
        assert_eq!(nodes[2].depth, 2);
        assert_eq!(nodes[4].depth, 1);
        assert_eq!(nodes[2].included_from.as_ref(), Some(&nodes[1].path));
    }

    #[test]
    fn test_references_resolve_relative_to_including_file() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{chapters/one}");
        write(temp.path(), "chapters/one.tex", "\\input{figs}");
        write(temp.path(), "chapters/figs.tex", "figures");
        write(temp.path(), "figs.tex", "wrong directory");

        let order = resolve_include_order(&main, &TexConfig::default()).unwrap();
        assert_eq!(
            names(temp.path(), &order),
            vec!["main.tex", "chapters/one.tex", "chapters/figs.tex"]
        );
    }

    #[test]
    fn test_equivalent_spellings_deduplicate() {
        let temp = tempdir().unwrap();
        let main = write(
            temp.path(),
            "main.tex",
            "\\input{sec/a}\n\\input{sec/../sec/a.tex}\n\\input{./sec/a}",
        );
        write(temp.path(), "sec/a.tex", "once");

        let order = resolve_include_order(&main, &TexConfig::default()).unwrap();
        assert_eq!(names(temp.path(), &order), vec!["main.tex", "sec/a.tex"]);
    }

    #[test]
    fn test_unresolved_and_commented_references_are_skipped() {
        let temp = tempdir().unwrap();
        let main = write(
            temp.path(),
            "main.tex",
            "\\input{missing}\n% \\input{a}\n\\input{b}",
        );
        write(temp.path(), "a.tex", "commented out");
        write(temp.path(), "b.tex", "kept");

        let nodes = walk_includes(&main, &TexConfig::default()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].references, vec!["missing", "b"]);
    }

    #[test]
    fn test_repeated_walk_with_same_visited_set_is_empty() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{a}");
        write(temp.path(), "a.tex", "leaf");

        let config = TexConfig::default();
        let mut walker = IncludeWalker::new(&config);
        assert_eq!(walker.walk(&main).unwrap().len(), 2);
        assert!(walker.walk(&main).unwrap().is_empty());
        // a file reached in the first walk is not revisited as a new root
        assert!(walker.walk(&temp.path().join("a.tex")).unwrap().is_empty());
    }

    #[test]
    fn test_fresh_walks_are_identical() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{a}\n\\include{b}");
        write(temp.path(), "a.tex", "\\input{b}");
        write(temp.path(), "b.tex", "\\input{main}");

        let config = TexConfig::default();
        let first = walk_includes(&main, &config).unwrap();
        let second = walk_includes(&main, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let temp = tempdir().unwrap();
        let depth = 2000;
        for i in 0..depth {
            write(temp.path(), &format!("f{}.tex", i), &format!("\\input{{f{}}}", i + 1));
        }
        write(temp.path(), &format!("f{}.tex", depth), "end");

        let order =
            resolve_include_order(&temp.path().join("f0.tex"), &TexConfig::default()).unwrap();
        assert_eq!(order.len(), depth + 1);
    }

    #[test]
    fn test_lossy_content_is_walked() {
        let temp = tempdir().unwrap();
        let main = temp.path().join("main.tex");
        fs::write(&main, b"\xe9\\input{a}").unwrap();
        write(temp.path(), "a.tex", "leaf");

        let nodes = walk_includes(&main, &TexConfig::default()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].lossy);
        assert!(!nodes[1].lossy);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_resolves_against_link_directory() {
        let temp = tempdir().unwrap();
        let main = write(temp.path(), "main.tex", "\\input{sections/intro}");
        write(temp.path(), "shared/intro.tex", "\\input{fig}");
        write(temp.path(), "sections/fig.tex", "figure");
        std::os::unix::fs::symlink(
            "../shared/intro.tex",
            temp.path().join("sections/intro.tex"),
        )
        .unwrap();

        let order = resolve_include_order(&main, &TexConfig::default()).unwrap();
        assert_eq!(
            names(temp.path(), &order),
            vec!["main.tex", "shared/intro.tex", "sections/fig.tex"]
        );
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp = tempdir().unwrap();
        let err = walk_includes(&temp.path().join("main.tex"), &TexConfig::default()).unwrap_err();
        assert_eq!(err.code(), "READ_FAILED");
    }
}

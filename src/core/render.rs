//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer, followed by a newline
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())?;
        writer.write_all(b"\n")
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown, one section per kind, item order preserved
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut roots = Vec::new();
        let mut files = Vec::new();
        let mut references = Vec::new();
        let mut artifacts = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Root => roots.push(item),
                Kind::File => files.push(item),
                Kind::Reference => references.push(item),
                Kind::Artifact => artifacts.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !roots.is_empty() {
            output.push_str("## Entry Document\n\n");
            for item in roots {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(tier) = data_str(item, "selected_by") {
                        output.push_str(&format!(" (selected by {})", tier));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !files.is_empty() {
            output.push_str("## Include Order\n\n");
            for (index, item) in files.iter().enumerate() {
                if let Some(path) = &item.path {
                    output.push_str(&format!("{}. `{}`", index + 1, path));
                    if let Some(size) = item.meta.size {
                        output.push_str(&format!(" ({} bytes)", size));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !references.is_empty() {
            output.push_str("## References\n\n");
            for item in references {
                self.render_reference_md(&mut output, item);
            }
            output.push('\n');
        }

        if !artifacts.is_empty() {
            output.push_str("## Artifacts\n\n");
            for item in artifacts {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(size) = item.meta.size {
                        output.push_str(&format!(" ({} bytes)", size));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_reference_md(&self, output: &mut String, item: &ResultItem) {
        let raw = item.excerpt.as_deref().unwrap_or_default();
        let line = item.range.map(|r| r.start).unwrap_or_default();
        let path = item.path.as_deref().unwrap_or_default();
        output.push_str(&format!("- `{}:{}` `{}`", path, line, raw));
        match data_str(item, "resolved") {
            Some(resolved) => output.push_str(&format!(" -> `{}`", resolved)),
            None => output.push_str(" (unresolved)"),
        }
        output.push('\n');
    }

    /// Render as raw output: excerpt when present, otherwise the path
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone().or_else(|| item.path.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn data_str<'a>(item: &'a ResultItem, key: &str) -> Option<&'a str> {
    item.data.as_ref()?.get(key)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Confidence, Range, ResultItem, SourceMode, TexcatError};
    use serde_json::json;

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::with_config(RenderConfig::with_pretty(format, false))
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("main.tex"));
        result_set.push(ResultItem::file("sections/intro.tex"));

        let renderer = renderer(OutputFormat::Jsonl);
        let output = renderer.render(&result_set);

        assert!(output.contains("main.tex"));
        assert!(output.contains("sections/intro.tex"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("main.tex"));

        let renderer = renderer(OutputFormat::Json);
        let output = renderer.render(&result_set);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("MARKDOWN".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "yaml".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert!(!config.pretty);
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("main.tex"));

        let renderer = Renderer::with_config(RenderConfig::with_pretty(OutputFormat::Json, true));
        let output = renderer.render(&result_set);

        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_empty() {
        let renderer = renderer(OutputFormat::Markdown);
        assert!(renderer.render(&ResultSet::new()).is_empty());
    }

    #[test]
    fn test_render_markdown_include_order_is_numbered() {
        let mut result_set = ResultSet::new();
        let mut first = ResultItem::file("main.tex");
        first.meta.size = Some(120);
        result_set.push(first);
        result_set.push(ResultItem::file("a.tex"));

        let renderer = renderer(OutputFormat::Markdown);
        let output = renderer.render(&result_set);

        assert!(output.contains("## Include Order"));
        assert!(output.contains("1. `main.tex` (120 bytes)"));
        assert!(output.contains("2. `a.tex`"));
    }

    #[test]
    fn test_render_markdown_root() {
        let mut result_set = ResultSet::new();
        result_set.push(
            ResultItem::root("paper.tex", Confidence::Medium)
                .with_data(json!({"selected_by": "document_marker"})),
        );

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("## Entry Document"));
        assert!(output.contains("`paper.tex` (selected by document_marker)"));
    }

    #[test]
    fn test_render_markdown_references() {
        let mut result_set = ResultSet::new();
        result_set.push(
            ResultItem::reference("main.tex", Range::line(3), "intro")
                .with_data(json!({"resolved": "intro.tex"})),
        );
        result_set.push(
            ResultItem::reference("main.tex", Range::line(4), "missing")
                .with_data(json!({"resolved": null})),
        );

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("`main.tex:3` `intro` -> `intro.tex`"));
        assert!(output.contains("`main.tex:4` `missing` (unresolved)"));
    }

    #[test]
    fn test_render_markdown_errors() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::error(TexcatError::new(
            "NO_ENTRY_DOCUMENT",
            "no entry document found under /tmp",
        )));

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("## Errors"));
        assert!(output.contains("NO_ENTRY_DOCUMENT"));
    }

    #[test]
    fn test_render_markdown_artifacts() {
        let mut result_set = ResultSet::new();
        let mut item = ResultItem::artifact("cat.txt", SourceMode::Emit);
        item.meta.size = Some(42);
        result_set.push(item);

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("## Artifacts"));
        assert!(output.contains("`cat.txt` (42 bytes)"));
    }

    #[test]
    fn test_render_raw_prefers_excerpt() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("main.tex"));
        result_set.push(ResultItem::reference("main.tex", Range::line(1), "intro"));

        let output = renderer(OutputFormat::Raw).render(&result_set);
        assert_eq!(output, "main.tex\nintro");
    }

    #[test]
    fn test_render_to_writer() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("main.tex"));

        let mut buffer = Vec::new();
        renderer(OutputFormat::Json)
            .render_to(&result_set, &mut buffer)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("main.tex"));
        assert!(output.ends_with('\n'));
    }
}

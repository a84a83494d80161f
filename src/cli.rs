//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::console::Console;
use crate::core::error::TexError;
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::tex::api::ConcatOptions;
use crate::tex::config::{TexConfig, DEFAULT_ENTRY_NAME};

/// texcat - find the entry document of a LaTeX tree and concatenate its includes.
#[derive(Parser, Debug)]
#[command(name = "texcat")]
#[command(
    author,
    version,
    about,
    long_about = r#"texcat locates the entry document of a LaTeX source tree, follows its
\input and \include directives, and concatenates every reachable file into a
single text artifact.

Entry selection order:
1. a file named main.tex (case-insensitive) anywhere in the tree
2. the first file containing \begin{document}
3. the first .tex file found

Inspection commands print a result set in the selected format (default: jsonl).

Examples:
    texcat root
    texcat files
    texcat refs main.tex
    texcat concat
    texcat concat --stdout > paper.txt
    texcat --root ./2401.12345 concat --cache-key 2401.12345
"#
)]
pub struct Cli {
    /// Source tree root.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Directory holding the extracted LaTeX sources (defaults to the current\n\
directory).\n\n\
Result paths are relative to this root, and positional paths are interpreted\n\
relative to it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for result sets.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (paths and excerpts only)"
    )]
    pub format: String,

    /// Base name of the conventional entry document.
    #[arg(
        long,
        global = true,
        env = "TEXCAT_ENTRY_NAME",
        default_value = DEFAULT_ENTRY_NAME,
        value_name = "NAME",
        long_help = "Base name (without extension) that marks the entry document.\n\n\
A file named NAME.tex anywhere in the tree wins root selection."
    )]
    pub entry_name: String,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no progress on stderr, errors only).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr, including every visited file and\n\
every reference that could not be resolved. RUST_LOG overrides this."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the entry document of the tree.
    #[command(
        long_about = "Scan ROOT for .tex files and report the entry document together with\n\
the rule that selected it (entry_name, document_marker or fallback).\n\n\
Fails when the tree contains no .tex file at all.\n\n\
Example:\n\
  texcat root\n"
    )]
    Root,

    /// List files in include order.
    #[command(
        long_about = "Walk \\input/\\include directives depth-first from the entry document and\n\
emit one result per file, in the order they would be concatenated.\n\n\
Every file appears once; include cycles and unresolvable references are skipped.\n\n\
Examples:\n\
  texcat files\n\
  texcat files --entry thesis.tex\n"
    )]
    Files {
        /// Start from this file instead of the selected entry document.
        #[arg(long, value_name = "FILE")]
        entry: Option<PathBuf>,
    },

    /// List the inclusion directives of one file.
    #[command(
        long_about = "Parse one file and emit every \\input/\\include directive with its line,\n\
form (braced/spaced) and the file it resolves to (null when unresolved).\n\n\
Example:\n\
  texcat refs main.tex\n"
    )]
    Refs {
        /// File to parse (relative to ROOT unless absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Concatenate the include graph into one artifact.
    #[command(
        long_about = "Resolve the include order and write every file, wrapped in\n\
'% >>>>>>>> BEGIN <path>' / '% <<<<<<<< END <path>' marker lines, into a single\n\
artifact (ROOT/cat.txt by default).\n\n\
With --cache-key the artifact is stored under CACHE_DIR/KEY/ and reused on later\n\
runs until --force is given or the engine settings change.\n\n\
Examples:\n\
  texcat concat\n\
  texcat concat --output build/paper.txt\n\
  texcat concat --stdout | wc -c\n\
  texcat concat --cache-key 2401.12345\n"
    )]
    Concat {
        /// Start from this file instead of the selected entry document.
        #[arg(long, value_name = "FILE")]
        entry: Option<PathBuf>,

        /// Artifact path (relative to ROOT unless absolute).
        #[arg(long, value_name = "PATH", conflicts_with = "cache_key")]
        output: Option<PathBuf>,

        /// Stream the artifact to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,

        /// Reuse or store the artifact under this key.
        #[arg(
            long,
            value_name = "KEY",
            long_help = "Identifier of the source tree, e.g. an arXiv id. Only the last\n\
'/'-separated segment is used, so a source URL works as a key too."
        )]
        cache_key: Option<String>,

        /// Cache directory (relative to ROOT unless absolute).
        #[arg(
            long,
            env = "TEXCAT_CACHE_DIR",
            default_value = ".texcat",
            value_name = "DIR"
        )]
        cache_dir: PathBuf,

        /// Recompute even when a valid cache entry exists.
        #[arg(long)]
        force: bool,
    },

    /// Manage cached artifacts.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove the cache entry for a key.
    Clear {
        #[arg(value_name = "KEY")]
        key: String,

        /// Cache directory (relative to ROOT unless absolute).
        #[arg(
            long,
            env = "TEXCAT_CACHE_DIR",
            default_value = ".texcat",
            value_name = "DIR"
        )]
        cache_dir: PathBuf,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);
    let console = Console::new(cli.quiet, cli.no_color);
    let config = TexConfig::default().with_entry_name(cli.entry_name);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    // stdout belongs to the artifact stream in this mode
    let streaming = matches!(cli.command, Commands::Concat { stdout: true, .. });

    let result = match cli.command {
        Commands::Root => crate::tex::api::run_root(&root, &config, render_config),

        Commands::Files { entry } => {
            crate::tex::api::run_files(&root, entry.as_deref(), &config, render_config)
        }

        Commands::Refs { file } => crate::tex::api::run_refs(&root, &file, &config, render_config),

        Commands::Concat {
            entry,
            output,
            stdout,
            cache_key,
            cache_dir,
            force,
        } => {
            let options = ConcatOptions {
                entry,
                output,
                stdout,
                cache_key,
                cache_dir,
                force,
            };
            crate::tex::api::run_concat(&root, &options, &config, render_config, console)
        }

        Commands::Cache { action } => match action {
            CacheCommands::Clear { key, cache_dir } => {
                crate::tex::api::run_cache_clear(&root, &cache_dir, &key, render_config)
            }
        },
    };

    if let Err(err) = &result {
        if let Some(tex_error) = err.downcast_ref::<TexError>() {
            if !streaming {
                report_error(tex_error, render_config);
            }
        }
    }
    result
}

/// Emit an engine failure as an error item so structured consumers see it too
fn report_error(error: &TexError, render_config: RenderConfig) {
    if render_config.format == OutputFormat::Raw {
        return;
    }
    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::error(error.to_item_error()));
    let _ = Renderer::with_config(render_config).render_to(&result_set, std::io::stdout().lock());
}

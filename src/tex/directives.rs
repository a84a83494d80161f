//! Inclusion directive parsing
//!
//! Recognizes `\input{file}`, `\include{file}` and their space-delimited
//! forms `\input file`. Text is processed line by line (`\n`, `\r\n` and a
//! lone `\r` all end a line); everything after the
//! first `%` on a line is a comment. There is no escape handling, so `\%`
//! also starts a comment and an argument containing `%` is truncated.
//!
//! Within one line all braced matches are reported before all
//! space-delimited matches.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Comment marker; the rest of the line is ignored
pub const COMMENT_MARKER: char = '%';

/// Any of the three line terminators
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("Invalid LINE_BREAK_RE regex"));

/// `\input{file}` / `\include{file}`
pub static BRACED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:include|input)\{([^}]*)\}").expect("Invalid BRACED_RE regex")
});

/// `\input file` / `\include file`
pub static SPACED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(?:include|input)\s+([^\s]+)").expect("Invalid SPACED_RE regex")
});

/// Syntactic form a directive was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveForm {
    Braced,
    Spaced,
}

impl DirectiveForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveForm::Braced => "braced",
            DirectiveForm::Spaced => "spaced",
        }
    }
}

/// One inclusion directive found in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Argument exactly as written
    pub reference: String,
    /// 1-indexed source line
    pub line: u32,
    pub form: DirectiveForm,
}

/// Strip surrounding whitespace and drop everything from the comment marker on
fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim();
    match trimmed.find(COMMENT_MARKER) {
        Some(index) => &trimmed[..index],
        None => trimmed,
    }
}

/// Extract every directive with its line number and form
pub fn parse_directives(text: &str) -> Vec<Directive> {
    let mut directives = Vec::new();

    for (index, line) in LINE_BREAK_RE.split(text).enumerate() {
        let line_num = index as u32 + 1;
        let code = strip_comment(line);
        if code.is_empty() {
            continue;
        }

        for caps in BRACED_RE.captures_iter(code) {
            directives.push(Directive {
                reference: caps[1].to_string(),
                line: line_num,
                form: DirectiveForm::Braced,
            });
        }
        for caps in SPACED_RE.captures_iter(code) {
            directives.push(Directive {
                reference: caps[1].to_string(),
                line: line_num,
                form: DirectiveForm::Spaced,
            });
        }
    }

    directives
}

/// Raw reference strings in order of appearance, duplicates kept
pub fn parse_references(text: &str) -> Vec<String> {
    parse_directives(text)
        .into_iter()
        .map(|directive| directive.reference)
        .collect()
}

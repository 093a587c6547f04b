//! Rendering options.
//!
//! Every engine knob is optional: `None` leaves MiniJinja's default in
//! place, so only what the user asked for changes the environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use minijinja::syntax::SyntaxConfig;

use crate::error::RenderError;

/// Extensions installed unless the caller opts out.
pub const DEFAULT_EXTENSIONS: &[&str] = &["stencil.ext.base64", "stencil.ext.json"];

/// Line ending written in place of every newline in the rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewlineSequence {
    Lf,
    CrLf,
    Cr,
}

impl NewlineSequence {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineSequence::Lf => "\n",
            NewlineSequence::CrLf => "\r\n",
            NewlineSequence::Cr => "\r",
        }
    }

    /// Rewrites every line ending in `text` to this sequence.
    pub fn apply(self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        match self {
            NewlineSequence::Lf => normalized,
            other => normalized.replace('\n', other.as_str()),
        }
    }
}

impl FromStr for NewlineSequence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lf" | "\n" => Ok(NewlineSequence::Lf),
            "crlf" | "\r\n" => Ok(NewlineSequence::CrLf),
            "cr" | "\r" => Ok(NewlineSequence::Cr),
            other => Err(format!("unknown newline sequence: {:?}", other)),
        }
    }
}

impl fmt::Display for NewlineSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NewlineSequence::Lf => "lf",
            NewlineSequence::CrLf => "crlf",
            NewlineSequence::Cr => "cr",
        };
        f.write_str(name)
    }
}

/// Custom template delimiters. Unset pairs keep the Jinja defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delimiters {
    pub block_start: Option<String>,
    pub block_end: Option<String>,
    pub variable_start: Option<String>,
    pub variable_end: Option<String>,
    pub comment_start: Option<String>,
    pub comment_end: Option<String>,
    pub line_statement_prefix: Option<String>,
    pub line_comment_prefix: Option<String>,
}

impl Delimiters {
    /// Returns `true` if any delimiter was supplied.
    pub fn is_customized(&self) -> bool {
        *self != Delimiters::default()
    }

    /// Builds the engine syntax, or `None` when nothing was customized.
    pub fn to_syntax(&self) -> Result<Option<SyntaxConfig>, RenderError> {
        if !self.is_customized() {
            return Ok(None);
        }

        let pair = |start: &Option<String>, end: &Option<String>, default: (&str, &str)| {
            (
                start.clone().unwrap_or_else(|| default.0.to_string()),
                end.clone().unwrap_or_else(|| default.1.to_string()),
            )
        };
        let (block_start, block_end) = pair(&self.block_start, &self.block_end, ("{%", "%}"));
        let (variable_start, variable_end) =
            pair(&self.variable_start, &self.variable_end, ("{{", "}}"));
        let (comment_start, comment_end) = pair(&self.comment_start, &self.comment_end, ("{#", "#}"));

        let mut builder = SyntaxConfig::builder();
        builder
            .block_delimiters(block_start, block_end)
            .variable_delimiters(variable_start, variable_end)
            .comment_delimiters(comment_start, comment_end);
        if let Some(prefix) = &self.line_statement_prefix {
            builder.line_statement_prefix(prefix.clone());
        }
        if let Some(prefix) = &self.line_comment_prefix {
            builder.line_comment_prefix(prefix.clone());
        }

        builder
            .build()
            .map(Some)
            .map_err(|err| RenderError::Syntax(err.to_string()))
    }
}

/// Settings for one render.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Undefined variables are errors instead of rendering empty.
    pub strict: bool,
    pub delimiters: Delimiters,
    pub trim_blocks: Option<bool>,
    pub lstrip_blocks: Option<bool>,
    pub keep_trailing_newline: Option<bool>,
    /// `true` escapes HTML, `false` disables escaping for every template.
    pub autoescape: Option<bool>,
    pub newline_sequence: Option<NewlineSequence>,
    /// Directories searched after the template's own directory.
    pub search_paths: Vec<PathBuf>,
    /// Extension references, in installation order.
    pub extensions: Vec<String>,
}

impl RenderOptions {
    /// Options with the default extensions installed.
    pub fn with_default_extensions() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }
}

//! Error types for loading template data.

use std::io;
use std::path::PathBuf;

/// Number of input characters quoted in a [`InputError::Malformed`] message.
pub const EXCERPT_LEN: usize = 60;

/// Boxed error returned by the individual format parsers.
pub type ParseError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while reading and parsing template data.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The format name is not recognized at all.
    #[error("unsupported data format: {0}")]
    UnsupportedFormat(String),

    /// The format is known but its parser was not compiled in.
    #[error("{format} format is not available; rebuild with the `{dependency}` feature enabled")]
    UnavailableFormat {
        format: &'static str,
        dependency: &'static str,
    },

    /// The parser rejected the input text.
    #[error("malformed {format} input: {excerpt}")]
    Malformed {
        format: &'static str,
        excerpt: String,
        #[source]
        source: ParseError,
    },

    /// Parsed data (or a selected section) is not a mapping.
    #[error("{0} is not a mapping")]
    NotAMapping(String),

    /// The requested top-level section does not exist.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// Failed to read a data file.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read from stdin.
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Failed to walk a data directory.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl InputError {
    /// Create a malformed-input error quoting the head of `text`.
    ///
    /// At most [`EXCERPT_LEN`] characters are kept, followed by ` ...`.
    pub fn malformed(format: &'static str, text: &str, source: ParseError) -> Self {
        Self::Malformed {
            format,
            excerpt: excerpt(text),
            source,
        }
    }
}

fn excerpt(text: &str) -> String {
    let head: String = text.chars().take(EXCERPT_LEN).collect();
    format!("{} ...", head)
}

//! Data sources and context assembly.
//!
//! A [`DataSource`] names where template data comes from: stdin, a single
//! file, or a directory of files. [`ContextBuilder`] reads the source,
//! parses it with the chosen format, layers `-D` overrides on top and
//! optionally narrows the result to one section.
//!
//! # Example
//!
//! ```no_run
//! use stencil_input::{ContextBuilder, DataSource, FormatRegistry, RealStdin};
//!
//! let registry = FormatRegistry::standard();
//! let context = ContextBuilder::new(&registry)
//!     .format("auto")
//!     .defines(["env=prod", "db.host=localhost"])
//!     .section(Some("app"))
//!     .build(&DataSource::from_arg(Some("config.yml")), &RealStdin)?;
//! # Ok::<(), stencil_input::InputError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::env::StdinReader;
use crate::format::{FormatRegistry, AUTO};
use crate::keys::parse_kv;
use crate::merge::merge;
use crate::{Context, InputError};

/// Where template data is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Read everything from standard input.
    Stdin,
    /// A file, or a directory of files to merge.
    Path(PathBuf),
}

impl DataSource {
    /// Interprets the optional data argument of the command line.
    ///
    /// A missing argument or `-` means stdin. A leading `~` is expanded
    /// against `HOME`.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => DataSource::Stdin,
            Some(path) => DataSource::Path(expand_home(path)),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => PathBuf::from(path),
    }
}

/// Selects the mapping stored under the top-level key `name`.
pub fn select_section(mut context: Context, name: &str) -> Result<Context, InputError> {
    match context.remove(name) {
        Some(Value::Object(section)) => Ok(section),
        Some(_) => Err(InputError::NotAMapping(format!("section '{}'", name))),
        None => Err(InputError::UnknownSection(name.to_string())),
    }
}

/// Builds the rendering context from a data source.
///
/// The steps run in a fixed order: read and parse the source, merge the
/// overrides, then select the section.
#[derive(Debug, Clone)]
pub struct ContextBuilder<'r> {
    registry: &'r FormatRegistry,
    format: String,
    defines: Vec<String>,
    section: Option<String>,
    recursive: bool,
}

impl<'r> ContextBuilder<'r> {
    /// Creates a builder using `registry` for format lookups.
    pub fn new(registry: &'r FormatRegistry) -> Self {
        Self {
            registry,
            format: AUTO.to_string(),
            defines: Vec::new(),
            section: None,
            recursive: false,
        }
    }

    /// Sets the format name, or `"auto"` to detect it (the default).
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Adds `key=value` overrides, applied after the source is parsed.
    pub fn defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines.extend(defines.into_iter().map(Into::into));
        self
    }

    /// Narrows the final context to one top-level key.
    pub fn section(mut self, section: Option<impl Into<String>>) -> Self {
        self.section = section.map(Into::into);
        self
    }

    /// Descend into subdirectories when the source is a directory.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Reads, parses, overrides and narrows the data into a context.
    pub fn build(&self, source: &DataSource, stdin: &dyn StdinReader) -> Result<Context, InputError> {
        let mut context = self.read(source, stdin)?;

        if !self.defines.is_empty() {
            tracing::debug!(count = self.defines.len(), "applying overrides");
            merge(&mut context, parse_kv(&self.defines));
        }

        match &self.section {
            Some(name) => {
                tracing::debug!(section = %name, "selecting section");
                select_section(context, name)
            }
            None => Ok(context),
        }
    }

    /// Reads and parses the source without applying overrides or sections.
    pub fn read(&self, source: &DataSource, stdin: &dyn StdinReader) -> Result<Context, InputError> {
        match source {
            DataSource::Stdin => self.read_stdin(stdin),
            DataSource::Path(path) if path.is_dir() => self.read_dir(path),
            DataSource::Path(path) => self.read_file(path),
        }
    }

    fn read_stdin(&self, stdin: &dyn StdinReader) -> Result<Context, InputError> {
        let format = self.registry.resolve(&self.format, None)?;
        if stdin.is_terminal() {
            tracing::debug!("stdin is a terminal, starting with an empty context");
            return Ok(Map::new());
        }
        let text = stdin.read_to_string().map_err(InputError::Stdin)?;
        tracing::debug!(format = format.name(), bytes = text.len(), "parsing stdin");
        format.parse(&text)
    }

    fn read_file(&self, path: &Path) -> Result<Context, InputError> {
        let format = self.registry.resolve(&self.format, Some(path))?;
        let text = fs::read_to_string(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(format = format.name(), path = %path.display(), "parsing data file");
        format.parse(&text)
    }

    fn read_dir(&self, dir: &Path) -> Result<Context, InputError> {
        let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut context = Map::new();
        for entry in walker {
            let entry = entry.map_err(|source| InputError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            tracing::trace!(path = %entry.path().display(), "merging directory entry");
            let parsed = self.read_file(entry.path())?;
            merge(&mut context, parsed);
        }
        Ok(context)
    }
}

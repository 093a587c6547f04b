//! Format registry and auto-detection.
//!
//! Every supported data format is described by a [`FormatDescriptor`]: its
//! name, aliases, file extensions, the cargo feature that compiles its parser
//! in, and the parser itself. A [`FormatRegistry`] holds the table and is
//! built once per invocation and passed explicitly to whoever needs it.
//!
//! Availability is probed at lookup time. A format whose feature is disabled
//! is still known to the registry, so asking for it reports
//! [`InputError::UnavailableFormat`] (install/enable something) rather than
//! [`InputError::UnsupportedFormat`] (no such format) or
//! [`InputError::Malformed`] (bad input).
//!
//! # Auto-detection
//!
//! | Source | Extension | Chosen format |
//! |--------|-----------|---------------|
//! | stdin | - | `yaml` if available, else `json` |
//! | file | known (`.json`, `.yml`, ...) | the matching format, or `UnavailableFormat` |
//! | file | absent or unknown | `yaml` if available, else `json` |
//!
//! YAML wins the fallback because any JSON document is also valid YAML.

mod env;
#[cfg(feature = "hjson")]
mod hjson;
mod ini;
mod json;
#[cfg(feature = "json5")]
mod json5;
mod querystring;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "xml")]
mod xml;
#[cfg(feature = "yaml")]
mod yaml;

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{InputError, ParseError};
use crate::Context;

/// Signature shared by all format parsers.
pub type ParseFn = fn(&str) -> Result<Value, ParseError>;

/// Name accepted by [`FormatRegistry::resolve`] to request auto-detection.
pub const AUTO: &str = "auto";

#[cfg(feature = "yaml")]
const YAML: Option<ParseFn> = Some(yaml::parse as ParseFn);
#[cfg(not(feature = "yaml"))]
const YAML: Option<ParseFn> = None;

#[cfg(feature = "toml")]
const TOML: Option<ParseFn> = Some(toml::parse as ParseFn);
#[cfg(not(feature = "toml"))]
const TOML: Option<ParseFn> = None;

#[cfg(feature = "xml")]
const XML: Option<ParseFn> = Some(xml::parse as ParseFn);
#[cfg(not(feature = "xml"))]
const XML: Option<ParseFn> = None;

#[cfg(feature = "hjson")]
const HJSON: Option<ParseFn> = Some(hjson::parse as ParseFn);
#[cfg(not(feature = "hjson"))]
const HJSON: Option<ParseFn> = None;

#[cfg(feature = "json5")]
const JSON5: Option<ParseFn> = Some(json5::parse as ParseFn);
#[cfg(not(feature = "json5"))]
const JSON5: Option<ParseFn> = None;

/// Describes one data format and how to parse it.
#[derive(Clone, Copy)]
pub struct FormatDescriptor {
    name: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
    feature: &'static str,
    parser: Option<ParseFn>,
}

impl FormatDescriptor {
    /// Creates a descriptor. A `None` parser marks the format as unavailable.
    pub const fn new(name: &'static str, feature: &'static str, parser: Option<ParseFn>) -> Self {
        Self {
            name,
            aliases: &[],
            extensions: &[],
            feature,
            parser,
        }
    }

    /// Sets alternative names accepted by [`FormatRegistry::lookup`].
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets the file extensions (without dot) that select this format.
    pub const fn extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    /// The canonical format name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The cargo feature that compiles this format's parser in.
    pub fn feature(&self) -> &'static str {
        self.feature
    }

    /// Whether the parser for this format is compiled in.
    pub fn is_available(&self) -> bool {
        self.parser.is_some()
    }

    fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    fn handles_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    fn unavailable(&self) -> InputError {
        InputError::UnavailableFormat {
            format: self.name,
            dependency: self.feature,
        }
    }

    /// Parses `text` into a context mapping.
    ///
    /// Falsy results (null, false, zero, empty string, sequence or mapping)
    /// become an empty context. Any other non-mapping result is
    /// [`InputError::NotAMapping`]. Parser failures become
    /// [`InputError::Malformed`] quoting the head of `text`.
    pub fn parse(&self, text: &str) -> Result<Context, InputError> {
        let parser = self.parser.ok_or_else(|| self.unavailable())?;
        let value = parser(text).map_err(|source| InputError::malformed(self.name, text, source))?;
        into_context(value, self.name)
    }
}

impl fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("name", &self.name)
            .field("available", &self.is_available())
            .finish()
    }
}

fn into_context(value: Value, format: &str) -> Result<Context, InputError> {
    if is_falsy(&value) {
        return Ok(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(InputError::NotAMapping(format!("top-level {} data", format))),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// The table of known data formats.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    /// Creates a registry from an explicit descriptor table.
    pub fn new(formats: Vec<FormatDescriptor>) -> Self {
        Self { formats }
    }

    /// The standard table: every format this crate knows, with availability
    /// following the enabled cargo features.
    pub fn standard() -> Self {
        Self::new(vec![
            FormatDescriptor::new("json", "serde_json", Some(json::parse as ParseFn))
                .extensions(&["json"]),
            FormatDescriptor::new("yaml", "yaml", YAML)
                .aliases(&["yml"])
                .extensions(&["yaml", "yml"]),
            FormatDescriptor::new("ini", "rust-ini", Some(ini::parse as ParseFn))
                .extensions(&["ini"]),
            FormatDescriptor::new("toml", "toml", TOML).extensions(&["toml"]),
            FormatDescriptor::new("xml", "xml", XML).extensions(&["xml"]),
            FormatDescriptor::new("env", "env", Some(env::parse as ParseFn))
                .extensions(&["env"]),
            FormatDescriptor::new("querystring", "url", Some(querystring::parse as ParseFn))
                .aliases(&["qs"])
                .extensions(&["querystring", "qs"]),
            FormatDescriptor::new("hjson", "hjson", HJSON).extensions(&["hjson"]),
            FormatDescriptor::new("json5", "json5", JSON5).extensions(&["json5"]),
        ])
    }

    /// Names of all known formats, available or not.
    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name).collect()
    }

    /// Names of the formats whose parsers are compiled in.
    pub fn available(&self) -> Vec<&'static str> {
        self.formats
            .iter()
            .filter(|f| f.is_available())
            .map(|f| f.name)
            .collect()
    }

    /// Returns `true` if `name` is known and its parser is compiled in.
    pub fn has_format(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    /// Looks up a format by name or alias.
    pub fn lookup(&self, name: &str) -> Result<&FormatDescriptor, InputError> {
        let descriptor = self
            .formats
            .iter()
            .find(|f| f.matches(name))
            .ok_or_else(|| InputError::UnsupportedFormat(name.to_string()))?;
        if !descriptor.is_available() {
            return Err(descriptor.unavailable());
        }
        Ok(descriptor)
    }

    /// Picks the format for data read from `path` (`None` for stdin).
    pub fn detect(&self, path: Option<&Path>) -> Result<&FormatDescriptor, InputError> {
        let ext = path.and_then(|p| p.extension()).and_then(|e| e.to_str());
        if let Some(descriptor) = ext.and_then(|ext| self.formats.iter().find(|f| f.handles_extension(ext))) {
            if !descriptor.is_available() {
                return Err(descriptor.unavailable());
            }
            tracing::debug!(format = descriptor.name, ?path, "format detected from extension");
            return Ok(descriptor);
        }

        let fallback = match self.lookup("yaml") {
            Ok(yaml) => yaml,
            Err(_) => self.lookup("json")?,
        };
        tracing::debug!(format = fallback.name, ?path, "no usable extension, using fallback format");
        Ok(fallback)
    }

    /// Resolves a user-supplied format choice: [`AUTO`] detects, anything
    /// else is looked up by name.
    pub fn resolve(&self, choice: &str, path: Option<&Path>) -> Result<&FormatDescriptor, InputError> {
        if choice == AUTO {
            self.detect(path)
        } else {
            self.lookup(choice)
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

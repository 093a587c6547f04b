//! Template data loading for stencil.
//!
//! `stencil-input` turns structured data into the context a template is
//! rendered against. It covers:
//!
//! - **Formats**: JSON, YAML, INI, TOML, XML, env, querystring, HJSON and
//!   JSON5, dispatched through a [`FormatRegistry`]
//! - **Sources**: stdin, a single file, or a directory of files
//!   ([`DataSource`])
//! - **Overrides**: dotted `key.path=value` pairs ([`parse_kv`])
//! - **Merging**: recursive deep merge of mappings ([`merge()`])
//! - **Sections**: narrowing the context to one top-level key
//!   ([`select_section`])
//!
//! # Quick Start
//!
//! ```
//! use serde_json::{json, Value};
//! use stencil_input::{ContextBuilder, DataSource, FormatRegistry, MockStdin};
//!
//! let registry = FormatRegistry::standard();
//! let context = ContextBuilder::new(&registry)
//!     .format("json")
//!     .defines(["user.name=Ada"])
//!     .build(&DataSource::Stdin, &MockStdin::piped(r#"{"user": {"id": 7}}"#))
//!     .unwrap();
//!
//! assert_eq!(Value::Object(context), json!({"user": {"id": 7, "name": "Ada"}}));
//! ```
//!
//! # Features
//!
//! JSON, INI, env and querystring parsing is always compiled in. The other
//! parsers sit behind cargo features, all enabled by default:
//!
//! - **`yaml`** - YAML via `serde_yaml`
//! - **`toml`** - TOML via `toml`
//! - **`xml`** - XML via `quick-xml`
//! - **`hjson`** - HJSON via `deser-hjson`
//! - **`json5`** - JSON5 via `json5`
//!
//! A disabled format stays known to the registry and reports
//! [`InputError::UnavailableFormat`] when requested.

pub mod env;
mod error;
pub mod format;
mod keys;
mod merge;
mod source;

pub use env::{MockStdin, RealStdin, StdinReader};
pub use error::{InputError, ParseError, EXCERPT_LEN};
pub use format::{FormatDescriptor, FormatRegistry, ParseFn, AUTO};
pub use keys::{assign, parse_kv};
pub use merge::merge;
pub use source::{select_section, ContextBuilder, DataSource};

/// The rendering context: a string-keyed mapping of nested values.
pub type Context = serde_json::Map<String, serde_json::Value>;

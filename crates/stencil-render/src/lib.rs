//! Template rendering for stencil.
//!
//! `stencil-render` turns a template file and a context into text using
//! MiniJinja. It owns everything between the parsed data and the output:
//!
//! - [`Renderer`]: builds the environment and renders one template file
//! - [`RenderOptions`]: strict mode, delimiters, whitespace handling,
//!   autoescape, newline sequence, search paths and extensions
//! - [`extension`]: resolving extension references to linked modules, local
//!   macro files or templates on the search path
//! - [`EnvReader`]: the process environment behind the `environ()` global
//!
//! Two globals are available in every template:
//!
//! - `environ(name, default=none)` reads an environment variable. In strict
//!   mode an unset variable without a default is an error.
//! - `get_context()` returns the whole context as one mapping.
//!
//! # Example
//!
//! ```
//! use std::fs;
//! use serde_json::json;
//! use stencil_render::{MockEnv, RenderOptions, Renderer};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let template = dir.path().join("hello.j2");
//! fs::write(&template, "{{ greeting }}, {{ environ('NAME') | b64encode }}").unwrap();
//!
//! let context = match json!({"greeting": "hi"}) {
//!     serde_json::Value::Object(map) => map,
//!     _ => unreachable!(),
//! };
//! let output = Renderer::new(RenderOptions::with_default_extensions())
//!     .environ(MockEnv::new().with_var("NAME", "ada"))
//!     .module_root(dir.path())
//!     .render_file(&template, &context)
//!     .unwrap();
//! assert_eq!(output, "hi, YWRh");
//! ```

mod environ;
mod error;
pub mod extension;
pub mod filters;
mod options;
mod renderer;

pub use environ::{EnvReader, MockEnv, RealEnv};
pub use error::{ExtensionError, RenderError};
pub use options::{Delimiters, NewlineSequence, RenderOptions, DEFAULT_EXTENSIONS};
pub use renderer::{search_loader, Renderer};

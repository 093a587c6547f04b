//! Template rendering.
//!
//! [`Renderer`] builds a MiniJinja environment for one template file and
//! renders it against a context:
//!
//! 1. A loader searching the template's directory, then each search path
//! 2. Engine settings, each applied only when supplied
//! 3. The `environ()` and `get_context()` globals
//! 4. Extensions, resolved and installed in order
//!
//! ```no_run
//! use stencil_render::{RenderOptions, Renderer};
//!
//! let context = serde_json::Map::new();
//! let output = Renderer::new(RenderOptions::with_default_extensions())
//!     .render_file("templates/page.j2".as_ref(), &context)?;
//! # Ok::<(), stencil_render::RenderError>(())
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use stencil_input::Context;

use crate::environ::{EnvReader, RealEnv};
use crate::error::RenderError;
use crate::extension::{install_template_module, Installed, Resolver};
use crate::options::RenderOptions;

/// Renders template files with a configured environment.
pub struct Renderer {
    options: RenderOptions,
    environ: Arc<dyn EnvReader>,
    module_root: Option<PathBuf>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            environ: Arc::new(RealEnv),
            module_root: None,
        }
    }

    /// Replaces the source of `environ()` lookups.
    pub fn environ(mut self, environ: impl EnvReader + 'static) -> Self {
        self.environ = Arc::new(environ);
        self
    }

    /// Directory local extension modules are looked up in.
    ///
    /// Defaults to the current working directory.
    pub fn module_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.module_root = Some(root.into());
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders the template at `template` against `context`.
    pub fn render_file(&self, template: &Path, context: &Context) -> Result<String, RenderError> {
        let name = template
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RenderError::TemplateNotFound(template.display().to_string()))?
            .to_string();
        let dir = match template.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut search = vec![dir];
        search.extend(self.options.search_paths.iter().cloned());
        let env = self.environment(search, context)?;

        tracing::debug!(template = %name, "rendering");
        let output = env.get_template(&name)?.render(context)?;
        Ok(match self.options.newline_sequence {
            Some(sequence) => sequence.apply(&output),
            None => output,
        })
    }

    /// Builds the environment for one render.
    pub fn environment(&self, search: Vec<PathBuf>, context: &Context) -> Result<Environment<'static>, RenderError> {
        let mut env = Environment::new();
        env.set_loader(search_loader(search));
        self.configure(&mut env)?;
        self.add_globals(&mut env, context);
        self.install_extensions(&mut env)?;
        Ok(env)
    }

    fn configure(&self, env: &mut Environment<'static>) -> Result<(), RenderError> {
        let options = &self.options;
        if options.strict {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }
        if let Some(syntax) = options.delimiters.to_syntax()? {
            env.set_syntax(syntax);
        }
        if let Some(trim) = options.trim_blocks {
            env.set_trim_blocks(trim);
        }
        if let Some(lstrip) = options.lstrip_blocks {
            env.set_lstrip_blocks(lstrip);
        }
        if let Some(keep) = options.keep_trailing_newline {
            env.set_keep_trailing_newline(keep);
        }
        if let Some(autoescape) = options.autoescape {
            env.set_auto_escape_callback(move |_| {
                if autoescape {
                    AutoEscape::Html
                } else {
                    AutoEscape::None
                }
            });
        }
        Ok(())
    }

    fn add_globals(&self, env: &mut Environment<'static>, context: &Context) {
        let reader = Arc::clone(&self.environ);
        let strict = self.options.strict;
        env.add_function(
            "environ",
            move |name: String, default: Option<Value>| -> Result<Value, Error> {
                match (reader.var(&name), default) {
                    (Some(value), _) => Ok(Value::from(value)),
                    (None, Some(default)) => Ok(default),
                    (None, None) if strict => Err(Error::new(
                        ErrorKind::UndefinedError,
                        format!("environment variable '{}' is not set", name),
                    )),
                    (None, None) => Ok(Value::UNDEFINED),
                }
            },
        );

        let whole = Value::from_serialize(context);
        env.add_function("get_context", move || whole.clone());
    }

    fn install_extensions(&self, env: &mut Environment<'static>) -> Result<(), RenderError> {
        if self.options.extensions.is_empty() {
            return Ok(());
        }
        let root = match &self.module_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let resolver = Resolver::standard(root);
        for reference in &self.options.extensions {
            if let Installed::Passthrough(name) = resolver.install(env, reference)? {
                install_template_module(env, &name)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("module_root", &self.module_root)
            .finish()
    }
}

/// Loads templates from the first directory that has them.
///
/// Names with `..`, root or prefix components are refused.
pub fn search_loader(
    dirs: Vec<PathBuf>,
) -> impl Fn(&str) -> Result<Option<String>, Error> + Send + Sync + 'static {
    move |name: &str| {
        let relative = Path::new(name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            tracing::debug!(template = name, "refusing template path outside the search path");
            return Ok(None);
        }
        for dir in &dirs {
            let path = dir.join(relative);
            if !path.is_file() {
                continue;
            }
            tracing::trace!(template = name, path = %path.display(), "loading template");
            return fs::read_to_string(&path).map(Some).map_err(|err| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("could not read template {}", path.display()),
                )
                .with_source(err)
            });
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environ::MockEnv;
    use crate::options::{Delimiters, NewlineSequence};
    use serde_json::json;
    use tempfile::TempDir;

    fn context(value: serde_json::Value) -> Context {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn render(source: &str, data: serde_json::Value, options: RenderOptions) -> Result<String, RenderError> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.j2");
        fs::write(&path, source).unwrap();
        Renderer::new(options)
            .environ(MockEnv::new().with_var("STENCIL_USER", "ada"))
            .module_root(dir.path())
            .render_file(&path, &context(data))
    }

    #[test]
    fn renders_context_values() {
        let out = render("{{ title }}", json!({"title": "foo"}), RenderOptions::default()).unwrap();
        assert_eq!(out, "foo");
    }

    #[test]
    fn lenient_mode_renders_undefined_as_empty() {
        let out = render("[{{ missing }}]", json!({}), RenderOptions::default()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn strict_mode_fails_on_undefined() {
        let options = RenderOptions {
            strict: true,
            ..RenderOptions::default()
        };
        let err = render("{{ missing }}", json!({}), options).unwrap_err();
        assert!(matches!(err, RenderError::TemplateError(_)));
    }

    #[test]
    fn environ_reads_variables_and_defaults() {
        let out = render(
            "{{ environ('STENCIL_USER') }}|{{ environ('NOPE', 'dflt') }}|{{ environ('NOPE') }}",
            json!({}),
            RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "ada|dflt|");
    }

    #[test]
    fn strict_environ_fails_for_unset_variables() {
        let options = RenderOptions {
            strict: true,
            ..RenderOptions::default()
        };
        let err = render("{{ environ('NOPE') }}", json!({}), options).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn get_context_returns_everything() {
        let out = render(
            "{% for k, v in get_context()|items %}{{ k }}={{ v }};{% endfor %}",
            json!({"a": 1, "b": "two"}),
            RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "a=1;b=two;");
    }

    #[test]
    fn custom_delimiters_apply_only_when_set() {
        let options = RenderOptions {
            delimiters: Delimiters {
                variable_start: Some("<<".into()),
                variable_end: Some(">>".into()),
                ..Delimiters::default()
            },
            ..RenderOptions::default()
        };
        let out = render("<< name >> {{ name }}", json!({"name": "x"}), options).unwrap();
        assert_eq!(out, "x {{ name }}");
    }

    #[test]
    fn trim_blocks_changes_whitespace() {
        let source = "{% if true %}\nyes\n{% endif %}\n";
        let plain = render(source, json!({}), RenderOptions::default()).unwrap();
        assert_eq!(plain, "\nyes\n");
        let options = RenderOptions {
            trim_blocks: Some(true),
            ..RenderOptions::default()
        };
        assert_eq!(render(source, json!({}), options).unwrap(), "yes\n");
    }

    #[test]
    fn keep_trailing_newline_is_opt_in() {
        let options = RenderOptions {
            keep_trailing_newline: Some(true),
            ..RenderOptions::default()
        };
        assert_eq!(render("a\n", json!({}), RenderOptions::default()).unwrap(), "a");
        assert_eq!(render("a\n", json!({}), options).unwrap(), "a\n");
    }

    #[test]
    fn newline_sequence_rewrites_output() {
        let options = RenderOptions {
            newline_sequence: Some(NewlineSequence::CrLf),
            keep_trailing_newline: Some(true),
            ..RenderOptions::default()
        };
        assert_eq!(render("a\nb\n", json!({}), options).unwrap(), "a\r\nb\r\n");
    }

    #[test]
    fn autoescape_toggles_html_escaping() {
        let on = RenderOptions {
            autoescape: Some(true),
            ..RenderOptions::default()
        };
        let off = RenderOptions {
            autoescape: Some(false),
            ..RenderOptions::default()
        };
        let data = json!({"v": "<b>"});
        assert_eq!(render("{{ v }}", data.clone(), on).unwrap(), "&lt;b&gt;");
        assert_eq!(render("{{ v }}", data, off).unwrap(), "<b>");
    }

    #[test]
    fn default_extensions_provide_filters() {
        let out = render(
            "{{ 'hi' | b64encode }} {{ ('{\"k\": 2}' | fromjson).k }}",
            json!({}),
            RenderOptions::with_default_extensions(),
        )
        .unwrap();
        assert_eq!(out, "aGk= 2");
    }

    #[test]
    fn without_extensions_filters_are_unknown() {
        let err = render("{{ 'hi' | b64encode }}", json!({}), RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateError(_)));
    }

    #[test]
    fn loader_refuses_parent_segments() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("inner.j2"), "inner").unwrap();
        let loader = search_loader(vec![dir.path().join("sub")]);
        assert!(loader("../inner.j2").unwrap().is_none());
        let loader = search_loader(vec![dir.path().to_path_buf()]);
        assert_eq!(loader("inner.j2").unwrap().as_deref(), Some("inner"));
    }

    #[test]
    fn search_paths_are_tried_after_the_template_dir() {
        let dir = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        fs::write(dir.path().join("page.j2"), "{% include 'part.j2' %}").unwrap();
        fs::write(shared.path().join("part.j2"), "shared").unwrap();
        let options = RenderOptions {
            search_paths: vec![shared.path().to_path_buf()],
            ..RenderOptions::default()
        };
        let out = Renderer::new(options)
            .render_file(&dir.path().join("page.j2"), &Context::new())
            .unwrap();
        assert_eq!(out, "shared");

        fs::write(dir.path().join("part.j2"), "local").unwrap();
        let options = RenderOptions {
            search_paths: vec![shared.path().to_path_buf()],
            ..RenderOptions::default()
        };
        let out = Renderer::new(options)
            .render_file(&dir.path().join("page.j2"), &Context::new())
            .unwrap();
        assert_eq!(out, "local");
    }
}

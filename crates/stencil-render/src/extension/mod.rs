//! Extension references and the modules they resolve to.
//!
//! An extension reference names something that adds filters and functions
//! to the template environment:
//!
//! | Reference              | Meaning |
//! |------------------------|---------|
//! | `base64`               | shorthand for `stencil.ext.base64` |
//! | `stencil.ext.json`     | a built-in extension |
//! | `stencil.filters`      | a whole linked module |
//! | `pkg.macros`           | a macro file relative to the working directory |
//! | `pkg.macros:shout`     | one macro of that file |
//! | `helpers:shout`        | one macro of `helpers.j2` |
//!
//! Modules come from [`ModuleProvider`]s tried in order: [`LinkedProvider`]
//! first, then [`LocalProvider`]. When `a.b` finds no module `a`, module
//! `a.b` itself is tried. A reference whose module nobody provides passes
//! through unchanged, unless its object was given explicitly with `:`. The
//! renderer then tries the passthrough name as a template on its search
//! path.
//!
//! ```
//! use stencil_render::extension::{Resolution, Resolver};
//!
//! let resolver = Resolver::standard("/nonexistent");
//! match resolver.resolve("base64").unwrap() {
//!     Resolution::Module { module, object } => {
//!         assert_eq!(module.name(), "stencil.ext");
//!         assert_eq!(object.as_deref(), Some("base64"));
//!     }
//!     Resolution::Passthrough(_) => unreachable!(),
//! }
//! ```

mod linked;
mod local;
pub(crate) mod macros;
mod reference;

use std::path::PathBuf;

use minijinja::Environment;

use crate::error::ExtensionError;

pub use linked::{LinkedModule, LinkedProvider, LINKED_MODULES};
pub use local::{LocalModule, LocalProvider, INDEX_STEM, MODULE_EXTENSIONS};
pub use reference::{ExtensionRef, ObjectSyntax, BUILTIN_MODULE, BUILTIN_PREFIX};

/// A loaded extension module.
pub trait Module {
    fn name(&self) -> &str;

    /// Installs `object`, or every public attribute when `object` is `None`.
    ///
    /// Returns the installed attribute names.
    fn install(&self, env: &mut Environment<'static>, object: Option<&str>) -> Result<Vec<String>, ExtensionError>;
}

/// A source of extension modules.
pub trait ModuleProvider {
    fn name(&self) -> &'static str;

    /// Looks a dotted module path up. `Ok(None)` means not found here.
    fn find(&self, module: &str) -> Result<Option<Box<dyn Module>>, ExtensionError>;
}

/// Outcome of resolving a reference.
pub enum Resolution {
    Module {
        module: Box<dyn Module>,
        object: Option<String>,
    },
    /// No provider had the module; left for the template loader.
    Passthrough(String),
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Module { module, object } => f
                .debug_struct("Module")
                .field("module", &module.name())
                .field("object", object)
                .finish(),
            Resolution::Passthrough(name) => f.debug_tuple("Passthrough").field(name).finish(),
        }
    }
}

/// What an installation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Installed {
    Attributes { module: String, names: Vec<String> },
    Passthrough(String),
}

/// Resolves references against an ordered list of providers.
pub struct Resolver {
    providers: Vec<Box<dyn ModuleProvider>>,
}

impl Resolver {
    pub fn new(providers: Vec<Box<dyn ModuleProvider>>) -> Self {
        Self { providers }
    }

    /// Linked modules, then macro files under `local_root`.
    pub fn standard(local_root: impl Into<PathBuf>) -> Self {
        Self::new(vec![
            Box::new(LinkedProvider::default()),
            Box::new(LocalProvider::new(local_root)),
        ])
    }

    fn find(&self, module: &str) -> Result<Option<Box<dyn Module>>, ExtensionError> {
        for provider in &self.providers {
            if let Some(found) = provider.find(module)? {
                tracing::debug!(module, provider = provider.name(), "extension module found");
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Resolves a reference to a module, or passes it through.
    pub fn resolve(&self, reference: &str) -> Result<Resolution, ExtensionError> {
        let parsed = ExtensionRef::parse(reference);
        tracing::debug!(
            reference = %parsed.raw,
            module = %parsed.module,
            object = ?parsed.object_name(),
            "resolving extension"
        );

        if let Some(module) = self.find(&parsed.module)? {
            return Ok(Resolution::Module {
                module,
                object: parsed.object_name().map(str::to_string),
            });
        }
        if parsed.has_explicit_object() {
            return Err(ExtensionError::ModuleNotFound(parsed.module));
        }
        // `a.b` may name module `a.b` itself rather than attribute `b` of `a`
        if parsed.object.is_some() {
            if let Some(module) = self.find(&parsed.raw)? {
                return Ok(Resolution::Module { module, object: None });
            }
        }
        if parsed.is_builtin() {
            return Err(ExtensionError::UnknownBuiltin(parsed.raw));
        }
        Ok(Resolution::Passthrough(parsed.raw))
    }

    /// Resolves `reference` and installs what it names into `env`.
    ///
    /// Passthrough references are not installed here.
    pub fn install(&self, env: &mut Environment<'static>, reference: &str) -> Result<Installed, ExtensionError> {
        match self.resolve(reference)? {
            Resolution::Module { module, object } => {
                let names = module.install(env, object.as_deref())?;
                tracing::debug!(module = module.name(), ?names, "installed extension");
                Ok(Installed::Attributes {
                    module: module.name().to_string(),
                    names,
                })
            }
            Resolution::Passthrough(name) => Ok(Installed::Passthrough(name)),
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("Resolver").field("providers", &names).finish()
    }
}

/// Installs the public macros of the template `name` from the loader.
///
/// A template the loader cannot find is [`ExtensionError::NotFound`].
pub fn install_template_module(env: &mut Environment<'static>, name: &str) -> Result<Vec<String>, ExtensionError> {
    let names = macros::exported_macros(env, name).map_err(|err| match err.kind() {
        minijinja::ErrorKind::TemplateNotFound => ExtensionError::NotFound(name.to_string()),
        _ => ExtensionError::Module {
            module: name.to_string(),
            source: err,
        },
    })?;
    for macro_name in &names {
        macros::register_macro(env, name, macro_name);
    }
    tracing::debug!(template = name, ?names, "installed template module");
    Ok(names)
}

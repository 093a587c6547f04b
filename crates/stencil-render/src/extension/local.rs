//! Macro files next to the working directory, used as extension modules.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Environment;

use super::macros::{exported_macros, register_selected};
use super::{Module, ModuleProvider};
use crate::error::ExtensionError;

/// Extensions tried, in order, when a module path is turned into a file.
pub const MODULE_EXTENSIONS: &[&str] = &["jinja", "jinja2", "j2"];

/// File name stem used when a module path names a directory.
pub const INDEX_STEM: &str = "index";

/// A macro file found on disk.
#[derive(Debug, Clone)]
pub struct LocalModule {
    name: String,
    path: PathBuf,
    source: String,
}

impl LocalModule {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn template_name(&self) -> String {
        format!("<extension {}>", self.name)
    }

    fn load_error(&self, source: minijinja::Error) -> ExtensionError {
        ExtensionError::Module {
            module: self.name.clone(),
            source,
        }
    }
}

impl Module for LocalModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, env: &mut Environment<'static>, object: Option<&str>) -> Result<Vec<String>, ExtensionError> {
        let template = self.template_name();
        env.add_template_owned(template.clone(), self.source.clone())
            .map_err(|err| self.load_error(err))?;
        let names = exported_macros(env, &template).map_err(|err| self.load_error(err))?;
        register_selected(env, &template, names, object).map_err(|attribute| ExtensionError::AttributeNotFound {
            module: self.name.clone(),
            attribute,
        })
    }
}

/// Finds macro files relative to a root directory.
///
/// The dotted module path becomes a directory path. `<path>.jinja`,
/// `<path>.jinja2` and `<path>.j2` are tried first, then
/// `<path>/index.{jinja,jinja2,j2}`.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Candidate files for `module`, in lookup order.
    pub fn candidates(&self, module: &str) -> Vec<PathBuf> {
        let segments: Vec<&str> = module.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Vec::new();
        }
        let base = segments.iter().fold(self.root.clone(), |path, segment| path.join(segment));

        let mut candidates: Vec<PathBuf> = MODULE_EXTENSIONS
            .iter()
            .map(|ext| {
                let mut file: OsString = base.clone().into_os_string();
                file.push(".");
                file.push(ext);
                PathBuf::from(file)
            })
            .collect();
        candidates.extend(
            MODULE_EXTENSIONS
                .iter()
                .map(|ext| base.join(format!("{}.{}", INDEX_STEM, ext))),
        );
        candidates
    }
}

impl ModuleProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    fn find(&self, module: &str) -> Result<Option<Box<dyn Module>>, ExtensionError> {
        let Some(path) = self.candidates(module).into_iter().find(|path| path.is_file()) else {
            return Ok(None);
        };
        tracing::trace!(module, path = %path.display(), "found local extension module");
        let source = fs::read_to_string(&path).map_err(|source| ExtensionError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Some(Box::new(LocalModule {
            name: module.to_string(),
            path,
            source,
        })))
    }
}

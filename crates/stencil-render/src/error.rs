//! Error types for template rendering.
//!
//! [`RenderError`] is the error type for every rendering operation. It wraps
//! the template engine's errors so the public API does not leak MiniJinja
//! types, and keeps the engine's message verbatim. [`ExtensionError`] covers
//! resolving and installing extension modules.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while resolving or installing an extension.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// An explicit `module:object` reference named a module that no provider has.
    #[error("extension module not found: {0}")]
    ModuleNotFound(String),

    /// The module exists but does not define the requested attribute.
    #[error("extension module '{module}' has no attribute '{attribute}'")]
    AttributeNotFound { module: String, attribute: String },

    /// A passthrough reference matched neither a module nor a template.
    #[error("extension not found: {0}")]
    NotFound(String),

    /// A `stencil.ext.` reference names no built-in extension.
    #[error("unknown built-in extension: {0}")]
    UnknownBuiltin(String),

    /// A local extension file could not be read.
    #[error("failed to read extension {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The module's template failed to compile or evaluate.
    #[error("extension module '{module}' failed to load: {source}")]
    Module {
        module: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Error type for template rendering operations.
#[derive(Debug)]
pub enum RenderError {
    /// Template syntax error, undefined value or other engine failure.
    TemplateError(String),

    /// Template not found on the loader search path.
    TemplateNotFound(String),

    /// Data serialization error.
    SerializationError(String),

    /// Extension resolution or installation failed.
    Extension(ExtensionError),

    /// Invalid delimiter configuration.
    Syntax(String),

    /// I/O error (e.g., resolving the working directory).
    IoError(std::io::Error),

    /// Other operational error.
    OperationError(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::TemplateNotFound(name) => write!(f, "template not found: {}", name),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::Extension(err) => write!(f, "{}", err),
            RenderError::Syntax(msg) => write!(f, "invalid template syntax settings: {}", msg),
            RenderError::IoError(err) => write!(f, "I/O error: {}", err),
            RenderError::OperationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::IoError(err) => Some(err),
            RenderError::Extension(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl From<ExtensionError> for RenderError {
    fn from(err: ExtensionError) -> Self {
        RenderError::Extension(err)
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(err.to_string()),
            ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod
            | ErrorKind::InvalidOperation
            | ErrorKind::MissingArgument
            | ErrorKind::TooManyArguments => RenderError::TemplateError(err.to_string()),
            ErrorKind::BadSerialization => RenderError::SerializationError(err.to_string()),
            _ => RenderError::OperationError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::TemplateNotFound("page.j2".to_string());
        assert!(err.to_string().contains("template not found"));
        assert!(err.to_string().contains("page.j2"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let render_err: RenderError = io_err.into();
        assert!(matches!(render_err, RenderError::IoError(_)));
    }

    #[test]
    fn test_from_minijinja_template_not_found() {
        let mj_err = minijinja::Error::new(
            minijinja::ErrorKind::TemplateNotFound,
            "template 'foo' not found",
        );
        let render_err: RenderError = mj_err.into();
        assert!(matches!(render_err, RenderError::TemplateNotFound(_)));
    }

    #[test]
    fn test_undefined_keeps_engine_message() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "'title' is undefined");
        let render_err: RenderError = mj_err.into();
        assert!(matches!(render_err, RenderError::TemplateError(_)));
        assert!(render_err.to_string().contains("'title' is undefined"));
    }

    #[test]
    fn test_extension_error_passes_through() {
        let err: RenderError = ExtensionError::NotFound("helpers".to_string()).into();
        assert_eq!(err.to_string(), "extension not found: helpers");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_attribute_not_found_names_both_parts() {
        let err = ExtensionError::AttributeNotFound {
            module: "macros".to_string(),
            attribute: "shout".to_string(),
        };
        assert_eq!(err.to_string(), "extension module 'macros' has no attribute 'shout'");
    }
}

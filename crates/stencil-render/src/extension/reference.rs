//! Parsing of extension references.

/// Prefix reserved for extensions compiled into stencil.
pub const BUILTIN_PREFIX: &str = "stencil.ext.";

/// Module holding the built-in extensions.
pub const BUILTIN_MODULE: &str = "stencil.ext";

/// How the object part of a reference was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectSyntax {
    /// `module:object`
    Explicit,
    /// `module.object`, split on the last dot
    Implicit,
}

/// A parsed extension reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRef {
    /// The reference as written, after bare-name expansion.
    pub raw: String,
    pub module: String,
    pub object: Option<(String, ObjectSyntax)>,
}

impl ExtensionRef {
    /// Parses a reference.
    ///
    /// A bare name such as `base64` expands to `stencil.ext.base64`. Then the
    /// string splits on `:` if present, else on the last `.`, else the whole
    /// string is the module.
    pub fn parse(reference: &str) -> Self {
        let raw = if reference.contains('.') || reference.contains(':') {
            reference.to_string()
        } else {
            format!("{}{}", BUILTIN_PREFIX, reference)
        };

        let (module, object) = if let Some((module, object)) = raw.split_once(':') {
            (module.to_string(), Some((object.to_string(), ObjectSyntax::Explicit)))
        } else if let Some((module, object)) = raw.rsplit_once('.') {
            (module.to_string(), Some((object.to_string(), ObjectSyntax::Implicit)))
        } else {
            (raw.clone(), None)
        };

        Self { raw, module, object }
    }

    /// Returns `true` for references under the reserved built-in prefix.
    pub fn is_builtin(&self) -> bool {
        self.raw.starts_with(BUILTIN_PREFIX)
    }

    /// The object name, however it was given.
    pub fn object_name(&self) -> Option<&str> {
        self.object.as_ref().map(|(name, _)| name.as_str())
    }

    /// Returns `true` if the object was given with `:`.
    pub fn has_explicit_object(&self) -> bool {
        matches!(self.object, Some((_, ObjectSyntax::Explicit)))
    }
}

//! Extension modules compiled into stencil.

use minijinja::Environment;

use super::reference::BUILTIN_MODULE;
use super::{Module, ModuleProvider};
use crate::error::ExtensionError;
use crate::filters;

type Installer = fn(&mut Environment<'static>);

/// A module whose attributes are Rust installers.
#[derive(Clone, Copy)]
pub struct LinkedModule {
    name: &'static str,
    attributes: &'static [(&'static str, Installer)],
}

impl LinkedModule {
    pub const fn new(name: &'static str, attributes: &'static [(&'static str, Installer)]) -> Self {
        Self { name, attributes }
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &'static str> {
        self.attributes.iter().map(|(name, _)| *name)
    }

    fn missing(&self, attribute: &str) -> ExtensionError {
        if self.name == BUILTIN_MODULE {
            ExtensionError::UnknownBuiltin(format!("{}.{}", self.name, attribute))
        } else {
            ExtensionError::AttributeNotFound {
                module: self.name.to_string(),
                attribute: attribute.to_string(),
            }
        }
    }
}

impl std::fmt::Debug for LinkedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedModule")
            .field("name", &self.name)
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .finish()
    }
}

impl Module for LinkedModule {
    fn name(&self) -> &str {
        self.name
    }

    fn install(&self, env: &mut Environment<'static>, object: Option<&str>) -> Result<Vec<String>, ExtensionError> {
        match object {
            Some(object) => {
                let (name, install) = self
                    .attributes
                    .iter()
                    .find(|(name, _)| *name == object)
                    .ok_or_else(|| self.missing(object))?;
                install(env);
                Ok(vec![name.to_string()])
            }
            None => {
                for (_, install) in self.attributes {
                    install(env);
                }
                Ok(self.attribute_names().map(str::to_string).collect())
            }
        }
    }
}

fn install_b64encode(env: &mut Environment<'static>) {
    env.add_filter("b64encode", filters::b64encode);
}

fn install_b64decode(env: &mut Environment<'static>) {
    env.add_filter("b64decode", filters::b64decode);
}

fn install_fromjson(env: &mut Environment<'static>) {
    env.add_filter("fromjson", filters::fromjson);
}

/// The modules every build carries.
pub static LINKED_MODULES: &[LinkedModule] = &[
    LinkedModule::new(
        BUILTIN_MODULE,
        &[("base64", filters::register_base64), ("json", filters::register_json)],
    ),
    LinkedModule::new(
        "stencil.filters",
        &[
            ("b64encode", install_b64encode),
            ("b64decode", install_b64decode),
            ("fromjson", install_fromjson),
        ],
    ),
];

/// Looks modules up among [`LINKED_MODULES`].
#[derive(Debug, Clone, Copy)]
pub struct LinkedProvider {
    modules: &'static [LinkedModule],
}

impl LinkedProvider {
    pub fn new(modules: &'static [LinkedModule]) -> Self {
        Self { modules }
    }
}

impl Default for LinkedProvider {
    fn default() -> Self {
        Self::new(LINKED_MODULES)
    }
}

impl ModuleProvider for LinkedProvider {
    fn name(&self) -> &'static str {
        "linked"
    }

    fn find(&self, module: &str) -> Result<Option<Box<dyn Module>>, ExtensionError> {
        Ok(self
            .modules
            .iter()
            .find(|linked| linked.name == module)
            .map(|linked| Box::new(*linked) as Box<dyn Module>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(module: &str) -> Option<Box<dyn Module>> {
        LinkedProvider::default().find(module).unwrap()
    }

    #[test]
    fn finds_both_linked_modules() {
        assert_eq!(find("stencil.ext").unwrap().name(), "stencil.ext");
        assert_eq!(find("stencil.filters").unwrap().name(), "stencil.filters");
        assert!(find("stencil").is_none());
        assert!(find("os.path").is_none());
    }

    #[test]
    fn installing_one_attribute() {
        let mut env = Environment::new();
        let installed = find("stencil.ext").unwrap().install(&mut env, Some("base64")).unwrap();
        assert_eq!(installed, ["base64"]);
        assert_eq!(env.render_str("{{ 'a' | b64encode }}", ()).unwrap(), "YQ==");
        assert!(env.render_str("{{ '[]' | fromjson }}", ()).is_err());
    }

    #[test]
    fn installing_the_whole_module() {
        let mut env = Environment::new();
        let installed = find("stencil.filters").unwrap().install(&mut env, None).unwrap();
        assert_eq!(installed, ["b64encode", "b64decode", "fromjson"]);
        assert_eq!(
            env.render_str("{{ ('[1]' | fromjson)[0] }}{{ 'YQ==' | b64decode }}", ())
                .unwrap(),
            "1a"
        );
    }

    #[test]
    fn unknown_builtin_is_reported_as_such() {
        let mut env = Environment::new();
        let err = find("stencil.ext").unwrap().install(&mut env, Some("i18n")).unwrap_err();
        assert!(matches!(err, ExtensionError::UnknownBuiltin(ref name) if name == "stencil.ext.i18n"));
    }

    #[test]
    fn missing_filter_is_an_attribute_error() {
        let mut env = Environment::new();
        let err = find("stencil.filters").unwrap().install(&mut env, Some("upper")).unwrap_err();
        assert!(matches!(err, ExtensionError::AttributeNotFound { .. }));
    }
}

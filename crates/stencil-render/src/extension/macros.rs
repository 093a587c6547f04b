//! Macro templates used as extension modules.
//!
//! A macro module is an ordinary template. Its public top-level macros are
//! registered as both filters and global functions. Each call re-evaluates
//! the module in the caller's environment, since a macro cannot outlive the
//! state it was defined in.

use minijinja::value::{Rest, ValueKind};
use minijinja::{Environment, Error, State, Value};

/// Lists the public macros a template exports, sorted by name.
pub(crate) fn exported_macros(env: &Environment<'static>, template: &str) -> Result<Vec<String>, Error> {
    let module = env.get_template(template)?;
    let captured = module.render_captured(())?;
    let state = captured.state();
    let names = state
        .exports()
        .into_iter()
        .filter(|name| !name.starts_with('_'))
        .filter(|name| state.lookup(name).is_some_and(|value| is_macro(&value, name)))
        .map(str::to_string)
        .collect();
    Ok(names)
}

/// A macro exposes its own name and an argument list; `{% set %}` values
/// do not.
fn is_macro(value: &Value, name: &str) -> bool {
    let named = value
        .get_attr("name")
        .is_ok_and(|attr| attr.as_str() == Some(name));
    let has_arguments = value
        .get_attr("arguments")
        .is_ok_and(|attr| attr.kind() == ValueKind::Seq);
    named && has_arguments
}

/// Registers macro `name` of `template` as a filter and a function.
pub(crate) fn register_macro(env: &mut Environment<'static>, template: &str, name: &str) {
    let (filter_template, filter_macro) = (template.to_string(), name.to_string());
    env.add_filter(
        name.to_string(),
        move |state: &State, value: Value, args: Rest<Value>| -> Result<Value, Error> {
            let mut all = Vec::with_capacity(args.len() + 1);
            all.push(value);
            all.extend(args.iter().cloned());
            call_macro(state, &filter_template, &filter_macro, &all)
        },
    );

    let (function_template, function_macro) = (template.to_string(), name.to_string());
    env.add_function(
        name.to_string(),
        move |state: &State, args: Rest<Value>| -> Result<Value, Error> {
            call_macro(state, &function_template, &function_macro, &args)
        },
    );
}

/// Registers every macro in `names`, or only `object` when given.
///
/// Returns the registered names, or `Err(object)` if `object` is not among
/// `names`.
pub(crate) fn register_selected(
    env: &mut Environment<'static>,
    template: &str,
    names: Vec<String>,
    object: Option<&str>,
) -> Result<Vec<String>, String> {
    let selected = match object {
        Some(object) if names.iter().any(|name| name == object) => vec![object.to_string()],
        Some(object) => return Err(object.to_string()),
        None => names,
    };
    for name in &selected {
        register_macro(env, template, name);
    }
    Ok(selected)
}

fn call_macro(state: &State, template: &str, name: &str, args: &[Value]) -> Result<Value, Error> {
    let module = state.env().get_template(template)?;
    let captured = module.render_captured(())?;
    let output = captured.state().call_macro(name, args)?;
    Ok(Value::from_safe_string(output))
}

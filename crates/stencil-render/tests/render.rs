//! Integration tests for stencil-render: extensions and template lookup
//! against real files.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use serial_test::serial;
use stencil_input::Context;
use stencil_render::{ExtensionError, MockEnv, RenderError, RenderOptions, Renderer};
use tempfile::TempDir;

fn context(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn options(extensions: &[&str]) -> RenderOptions {
    let mut options = RenderOptions::with_default_extensions();
    options.extensions.extend(extensions.iter().map(|e| e.to_string()));
    options
}

const HELPERS: &str = r#"
{%- macro shout(text) -%}{{ text | upper }}!{%- endmacro -%}
{%- macro wrap(text, left="(", right=")") -%}{{ left }}{{ text }}{{ right }}{%- endmacro -%}
"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "helpers.j2", HELPERS);
    write(dir.path(), "pkg/text/index.jinja", HELPERS);
    dir
}

fn render_in(dir: &Path, template: &str, data: Value, options: RenderOptions) -> Result<String, RenderError> {
    write(dir, "template.j2", template);
    Renderer::new(options)
        .environ(MockEnv::new())
        .module_root(dir)
        .render_file(&dir.join("template.j2"), &context(data))
}

// ============================================================================
// Local macro modules
// ============================================================================

#[test]
fn whole_local_module_installs_every_macro() {
    let dir = workspace();
    let out = render_in(
        dir.path(),
        "{{ name | shout }} {{ wrap(name) }}",
        json!({"name": "ada"}),
        options(&["helpers"]),
    );
    // a bare name expands to the built-in namespace
    assert!(matches!(
        out,
        Err(RenderError::Extension(ExtensionError::UnknownBuiltin(_)))
    ));

    let out = render_in(
        dir.path(),
        "{{ name | shout }} {{ wrap(name) }}",
        json!({"name": "ada"}),
        options(&["pkg.text"]),
    )
    .unwrap();
    assert_eq!(out, "ADA! (ada)");
}

#[test]
fn explicit_object_installs_only_that_macro() {
    let dir = workspace();
    let out = render_in(
        dir.path(),
        "{{ name | wrap('<', '>') }}",
        json!({"name": "ada"}),
        options(&["helpers:wrap"]),
    )
    .unwrap();
    assert_eq!(out, "<ada>");

    let err = render_in(
        dir.path(),
        "{{ name | shout }}",
        json!({"name": "ada"}),
        options(&["helpers:wrap"]),
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::TemplateError(_)));
}

#[test]
fn implicit_object_resolves_through_the_last_dot() {
    let dir = workspace();
    let out = render_in(dir.path(), "{{ 'x' | shout }}", json!({}), options(&["pkg.text.shout"])).unwrap();
    assert_eq!(out, "X!");
}

#[test]
fn missing_attribute_aborts_before_rendering() {
    let dir = workspace();
    let err = render_in(dir.path(), "never", json!({}), options(&["helpers:whisper"])).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Extension(ExtensionError::AttributeNotFound { .. })
    ));
}

#[test]
fn explicit_object_on_missing_module_fails() {
    let dir = workspace();
    let err = render_in(dir.path(), "never", json!({}), options(&["nothing.here:obj"])).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Extension(ExtensionError::ModuleNotFound(ref m)) if m == "nothing.here"
    ));
}

// ============================================================================
// Passthrough to the template loader
// ============================================================================

#[test]
fn passthrough_loads_a_macro_template_from_the_search_path() {
    let dir = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    write(shared.path(), "lib/common.j2", HELPERS);

    let mut opts = options(&["lib/common.j2"]);
    opts.search_paths.push(shared.path().to_path_buf());
    let out = render_in(dir.path(), "{{ 'hey' | shout }}", json!({}), opts).unwrap();
    assert_eq!(out, "HEY!");
}

#[test]
fn passthrough_without_a_template_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = render_in(dir.path(), "never", json!({}), options(&["vendor.ext"])).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Extension(ExtensionError::NotFound(ref name)) if name == "vendor.ext"
    ));
}

// ============================================================================
// Defaults and the working directory
// ============================================================================

#[test]
fn extensions_can_be_dropped_entirely() {
    let dir = TempDir::new().unwrap();
    let out = render_in(dir.path(), "{{ 1 + 1 }}", json!({}), RenderOptions::default()).unwrap();
    assert_eq!(out, "2");
}

#[test]
#[serial]
fn local_modules_default_to_the_working_directory() {
    let dir = workspace();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    write(dir.path(), "template.j2", "{{ shout('cwd') }}");
    let result = Renderer::new(options(&["helpers:shout"]))
        .render_file(&dir.path().join("template.j2"), &Context::new());

    std::env::set_current_dir(previous).unwrap();
    assert_eq!(result.unwrap(), "CWD!");
}

#[test]
#[serial]
fn environ_reads_the_real_process_environment() {
    std::env::set_var("STENCIL_RENDER_TEST_VAR", "from-env");
    let dir = TempDir::new().unwrap();
    write(dir.path(), "template.j2", "{{ environ('STENCIL_RENDER_TEST_VAR') }}");
    let out = Renderer::new(RenderOptions::default())
        .render_file(&dir.path().join("template.j2"), &Context::new())
        .unwrap();
    std::env::remove_var("STENCIL_RENDER_TEST_VAR");
    assert_eq!(out, "from-env");
}

#[test]
fn missing_template_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = Renderer::new(RenderOptions::default())
        .render_file(&dir.path().join("absent.j2"), &Context::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::TemplateNotFound(_)));
}

#[test]
fn includes_resolve_relative_to_the_template() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "partials/footer.j2", "-- {{ who }}");
    let out = render_in(
        dir.path(),
        "body\n{% include 'partials/footer.j2' %}",
        json!({"who": "ada"}),
        RenderOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "body\n-- ada");
}

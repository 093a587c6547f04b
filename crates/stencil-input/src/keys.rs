//! Dotted-key assignment.
//!
//! Turns flat `a.b.c=value` pairs into nested mappings. Used for `-D`
//! overrides and for querystring data.

use serde_json::{Map, Value};

use crate::merge::merge;
use crate::Context;

/// Assigns `value` at the dotted path `key` inside `target`.
///
/// Each `.`-separated segment becomes one level of nesting. Missing levels
/// are created, paths sharing a prefix merge, and a repeated full path
/// overwrites the leaf. An intermediate that holds a non-mapping value is
/// replaced by a mapping.
pub fn assign(target: &mut Context, key: &str, value: Value) {
    merge(target, nest(key, value));
}

/// Builds a single-path mapping such as `{"a": {"b": value}}` from `"a.b"`.
fn nest(key: &str, value: Value) -> Context {
    let mut segments = key.rsplit('.');
    let leaf = segments.next().unwrap_or(key);

    let mut node: Context = Map::new();
    node.insert(leaf.to_string(), value);
    for segment in segments {
        let mut parent = Map::new();
        parent.insert(segment.to_string(), Value::Object(node));
        node = parent;
    }
    node
}

/// Folds `key=value` pairs into a nested context.
///
/// A pair without `=` assigns `null`. Values are kept as strings; the split
/// happens on the first `=` so values may contain `=` themselves.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use stencil_input::parse_kv;
///
/// let ctx = parse_kv(["a.b=1", "a.c=2", "flag"]);
/// assert_eq!(Value::Object(ctx), json!({"a": {"b": "1", "c": "2"}, "flag": null}));
/// ```
pub fn parse_kv<I, S>(pairs: I) -> Context
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut context = Map::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Value::String(value.to_string())),
            None => (pair, Value::Null),
        };
        tracing::trace!(key, "assigning dotted key");
        assign(&mut context, key, value);
    }
    context
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn assigned_value_is_reachable(
            segments in prop::collection::vec("[a-z]{1,3}", 1..5),
            value in "[a-z0-9]{0,6}",
        ) {
            let key = segments.join(".");
            let ctx = parse_kv([format!("{}={}", key, value)]);

            let mut node = &Value::Object(ctx);
            for segment in &segments {
                node = node.get(segment).expect("segment present");
            }
            prop_assert_eq!(node, &Value::String(value));
        }
    }
}

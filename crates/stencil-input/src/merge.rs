//! Recursive deep merge of context mappings.
//!
//! Only mapping-into-mapping collisions recurse. Every other collision,
//! including sequences and mapping/scalar pairs, is won by the incoming
//! value. `null` is an ordinary value, not a deletion marker.

use serde_json::Value;

use crate::Context;

/// Merges `source` into `target` in place and returns `target`.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use stencil_input::{merge, Context};
///
/// let mut target: Context = serde_json::from_value(json!({"a": {"b": 1}, "c": 1})).unwrap();
/// let source: Context = serde_json::from_value(json!({"a": {"d": 2}, "c": [1]})).unwrap();
///
/// merge(&mut target, source);
/// assert_eq!(Value::Object(target), json!({"a": {"b": 1, "d": 2}, "c": [1]}));
/// ```
pub fn merge(target: &mut Context, source: Context) -> &mut Context {
    for (key, incoming) in source {
        match target.get_mut(&key) {
            Some(Value::Object(existing)) if incoming.is_object() => {
                if let Value::Object(incoming) = incoming {
                    merge(existing, incoming);
                }
            }
            _ => {
                target.insert(key, incoming);
            }
        }
    }
    target
}

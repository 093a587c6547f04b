//! URL querystrings via `url::form_urlencoded`.
//!
//! Percent-encoding is decoded, values are trimmed, blank values are
//! dropped, a key given several times becomes a list, and dotted keys nest.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::ParseError;
use crate::keys::assign;

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in form_urlencoded::parse(text.trim().as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match grouped.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value.to_string()),
            None => grouped.push((key.into_owned(), vec![value.to_string()])),
        }
    }

    let mut context = Map::new();
    for (key, mut values) in grouped {
        let value = if values.len() == 1 {
            Value::String(values.remove(0))
        } else {
            Value::Array(values.into_iter().map(Value::String).collect())
        };
        assign(&mut context, &key, value);
    }
    Ok(Value::Object(context))
}

//! TOML via the `toml` crate.
//!
//! The document is parsed into a `toml::Table` and converted by hand so that
//! datetimes come out as their RFC 3339 strings instead of serde's private
//! datetime wrapper.

use serde_json::{Map, Number, Value};

use crate::error::ParseError;

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    let table: ::toml::Table = text.parse()?;
    Ok(convert(::toml::Value::Table(table)))
}

fn convert(value: ::toml::Value) -> Value {
    use ::toml::Value as Toml;

    match value {
        Toml::String(s) => Value::String(s),
        Toml::Integer(i) => Value::from(i),
        Toml::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Toml::Boolean(b) => Value::Bool(b),
        Toml::Datetime(dt) => Value::String(dt.to_string()),
        Toml::Array(items) => Value::Array(items.into_iter().map(convert).collect()),
        Toml::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

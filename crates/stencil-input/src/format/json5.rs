//! JSON5 via the `json5` crate.

use serde_json::Value;

use crate::error::ParseError;

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    Ok(::json5::from_str(text)?)
}

//! JSON via `serde_json`.

use serde_json::Value;

use crate::error::ParseError;

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(text)?)
}

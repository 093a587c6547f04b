//! HJSON via `deser-hjson`.

use serde_json::Value;

use crate::error::ParseError;

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(deser_hjson::from_str(text)?)
}

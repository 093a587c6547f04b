//! Built-in filters shipped as linked extensions.
//!
//! | Filter      | Input  | Output |
//! |-------------|--------|--------|
//! | `b64encode` | string | standard base64 of its UTF-8 bytes |
//! | `b64decode` | string | decoded text (must be UTF-8) |
//! | `fromjson`  | string | the parsed JSON value |

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use minijinja::{Environment, Error, ErrorKind, Value};

pub fn b64encode(value: String) -> String {
    STANDARD.encode(value.as_bytes())
}

pub fn b64decode(value: String) -> Result<String, Error> {
    let bytes = STANDARD.decode(value.trim().as_bytes()).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "b64decode: input is not valid base64").with_source(err)
    })?;
    String::from_utf8(bytes).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "b64decode: decoded bytes are not UTF-8").with_source(err)
    })
}

pub fn fromjson(value: String) -> Result<Value, Error> {
    let parsed: serde_json::Value = serde_json::from_str(&value).map_err(|err| {
        Error::new(ErrorKind::InvalidOperation, "fromjson: input is not valid JSON").with_source(err)
    })?;
    Ok(Value::from_serialize(&parsed))
}

/// Registers `b64encode` and `b64decode`.
pub fn register_base64(env: &mut Environment<'static>) {
    env.add_filter("b64encode", b64encode);
    env.add_filter("b64decode", b64decode);
}

/// Registers `fromjson`.
pub fn register_json(env: &mut Environment<'static>) {
    env.add_filter("fromjson", fromjson);
}

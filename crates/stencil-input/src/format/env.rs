//! dotenv-style `KEY=value` files.
//!
//! Blank lines and `#` comments are skipped. Each remaining line splits on
//! its first `=`. Values are taken literally: no `$VAR` substitution takes
//! place. A value wrapped in double quotes has `\n`, `\r`, `\t`, `\"` and
//! `\\` escapes decoded; a value in single quotes is kept as written.

use serde_json::{Map, Value};

use crate::error::ParseError;

#[derive(Debug, thiserror::Error)]
#[error("line {line}: expected KEY=value, found `{text}`")]
struct MissingAssignment {
    line: usize,
    text: String,
}

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    let mut vars = Map::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| MissingAssignment {
            line: index + 1,
            text: line.to_string(),
        })?;
        vars.insert(key.trim().to_string(), Value::String(unquote(value.trim())));
    }
    Ok(Value::Object(vars))
}

fn unquote(value: &str) -> String {
    if let Some(inner) = strip_pair(value, '"') {
        return unescape(inner);
    }
    if let Some(inner) = strip_pair(value, '\'') {
        return inner.to_string();
    }
    value.to_string()
}

fn strip_pair(value: &str, quote: char) -> Option<&str> {
    if value.len() >= 2 {
        value.strip_prefix(quote)?.strip_suffix(quote)
    } else {
        None
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

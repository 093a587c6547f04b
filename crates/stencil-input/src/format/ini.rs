//! INI via `rust-ini`.
//!
//! Produces `{section: {key: value}}`. Values in a `[DEFAULT]` section are
//! inherited by every other section. Keys outside any section are rejected
//! and a section that appears twice is merged into one. Option names are
//! lowercased while section names keep their case. Indented lines continue
//! the previous value.

use ::ini::{Ini, ParseOption};
use serde_json::{Map, Value};

use crate::error::ParseError;

const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, thiserror::Error)]
#[error("key `{0}` appears before any [section] header")]
struct MissingSectionHeader(String);

pub(crate) fn parse(text: &str) -> Result<Value, ParseError> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        enabled_indented_mutiline_value: true,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, options)?;

    let mut defaults = Map::new();
    let mut sections = Map::new();
    for (section, properties) in ini.iter() {
        let entries = properties
            .iter()
            .map(|(key, value)| (key.to_lowercase(), Value::String(value.to_string())));
        match section {
            None => {
                if let Some((key, _)) = properties.iter().next() {
                    return Err(MissingSectionHeader(key.to_string()).into());
                }
            }
            Some(DEFAULT_SECTION) => defaults.extend(entries),
            Some(name) => {
                let slot = sections
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = slot {
                    map.extend(entries);
                }
            }
        }
    }

    if !defaults.is_empty() {
        for section in sections.values_mut() {
            if let Value::Object(map) = section {
                let mut inherited = defaults.clone();
                inherited.extend(std::mem::take(map));
                *map = inherited;
            }
        }
    }

    Ok(Value::Object(sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sections() {
        assert_eq!(parse("").unwrap(), json!({}));
        assert_eq!(parse("[data]\nfoo=bar").unwrap(), json!({"data": {"foo": "bar"}}));
        assert_eq!(
            parse("[data]\nfoo=bar\nham=spam").unwrap(),
            json!({"data": {"foo": "bar", "ham": "spam"}})
        );
        assert_eq!(
            parse("[data1]\nfoo=bar\n[data2]\nham=spam").unwrap(),
            json!({"data1": {"foo": "bar"}, "data2": {"ham": "spam"}})
        );
    }

    #[test]
    fn repeated_sections_merge() {
        assert_eq!(
            parse("[data]\nfoo=bar\n[data]\nham=spam").unwrap(),
            json!({"data": {"foo": "bar", "ham": "spam"}})
        );
    }

    #[test]
    fn defaults_are_inherited() {
        assert_eq!(
            parse("[DEFAULT]\nshared=1\n[a]\nx=2\n[b]\nshared=3").unwrap(),
            json!({"a": {"shared": "1", "x": "2"}, "b": {"shared": "3"}})
        );
    }

    #[test]
    fn backslashes_are_kept() {
        assert_eq!(
            parse("[paths]\nroot=C:\\data").unwrap(),
            json!({"paths": {"root": "C:\\data"}})
        );
    }

    #[test]
    fn option_names_are_lowercased() {
        assert_eq!(
            parse("[Data]\nFOO=bar").unwrap(),
            json!({"Data": {"foo": "bar"}})
        );
        assert_eq!(
            parse("[DEFAULT]\nShared=1\n[a]\nshared=2").unwrap(),
            json!({"a": {"shared": "2"}})
        );
    }

    #[test]
    fn indented_lines_continue_the_value() {
        let parsed = parse("[data]\nfoo = a\n  b\nham = spam").unwrap();
        let foo = parsed["data"]["foo"].as_str().unwrap();
        let lines: Vec<&str> = foo.lines().map(str::trim).collect();
        assert_eq!(lines, ["a", "b"]);
        assert_eq!(parsed["data"]["ham"], json!("spam"));
    }

    #[test]
    fn quotes_are_kept() {
        assert_eq!(
            parse("[data]\nfoo=\"bar\"").unwrap(),
            json!({"data": {"foo": "\"bar\""}})
        );
    }

    #[test]
    fn keys_without_section_are_rejected() {
        let err = parse("foo=bar\nham=spam").unwrap_err();
        assert!(err.to_string().contains("foo"));
    }
}

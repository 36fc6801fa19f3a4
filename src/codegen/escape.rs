//! Escaping and serialization helpers shared by every generator
//!
//! All functions here are pure and allocation-only.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use crate::errors::{ApisnipError, Result};
use crate::spec::ParamMap;

/// Bytes left as-is in query keys and values (RFC 3986 unreserved)
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Shell-quote an argument for a POSIX shell.
///
/// Arguments made only of ASCII alphanumerics and `-_./:` are returned bare.
/// Everything else is single-quoted, with embedded single quotes written as
/// `'"'"'`.
pub fn shell_quote(s: &str) -> String {
    let is_safe = !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':'));

    if is_safe {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Double-quoted Python string literal
pub fn python_string(s: &str) -> String {
    quote_with(s, |out, c| out.push_str(&format!("\\x{:02x}", c as u32)))
}

/// Double-quoted JavaScript string literal
pub fn js_string(s: &str) -> String {
    quote_with(s, |out, c| out.push_str(&format!("\\u{:04x}", c as u32)))
}

fn quote_with(s: &str, control: impl Fn(&mut String, char)) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => control(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Canonical JSON: two-space indent, insertion key order, no trailing newline
pub fn canonical_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApisnipError::Serialization(format!("body is not serializable as JSON: {}", e)))
}

/// Render a JSON value as a Python literal laid out like [`canonical_json`]
pub fn python_literal(value: &Value) -> String {
    let mut out = String::new();
    write_python(&mut out, value, 0);
    out
}

fn write_python(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&python_string(s)),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, depth + 1);
                write_python(out, item, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(out, depth + 1);
                out.push_str(&python_string(key));
                out.push_str(": ");
                write_python(out, item, depth + 1);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, depth);
            out.push('}');
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// Percent-encode a single query key or value
pub fn encode_query_component(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

/// `k=v&k2=v2` in insertion order
pub fn encode_query(params: &ParamMap) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_query_component(k), encode_query_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Split `url` into the part before `#` and the fragment (without `#`)
pub fn split_fragment(url: &str) -> (&str, Option<&str>) {
    match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    }
}

/// Text to put between a fragment-free URL and an encoded query.
///
/// Empty when the URL already ends in `?` or `&`.
pub fn query_separator(base: &str) -> &'static str {
    match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    }
}

/// Append query params to a URL, before any fragment.
///
/// Uses `&` when the URL already carries a query string.
pub fn append_query(url: &str, params: &ParamMap) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let (base, fragment) = split_fragment(url);

    let mut full = format!("{}{}{}", base, query_separator(base), encode_query(params));
    if let Some(fragment) = fragment {
        full.push('#');
        full.push_str(fragment);
    }
    full
}

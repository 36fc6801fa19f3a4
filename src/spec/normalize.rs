//! Validation and canonicalization of raw request specs

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::types::{Body, ParamMap, RawSpec, RequestSpec};
use crate::errors::{ApisnipError, Result};
use crate::http::Method;

/// Turn a raw spec into a [`RequestSpec`], or explain why it cannot be one.
///
/// Nothing downstream ever sees an invalid URL or method.
pub fn normalize(raw: RawSpec) -> Result<RequestSpec> {
    let url = raw.url.as_deref().map(str::trim).unwrap_or_default();
    let parsed_url = parse_url(url)?;

    let method = match raw.method.as_deref() {
        Some(m) if !m.trim().is_empty() => m.parse::<Method>().map_err(ApisnipError::Validation)?,
        _ => return Err(ApisnipError::Validation("method is required".to_string())),
    };

    let headers = drop_empty_keys(raw.headers.unwrap_or_default(), "header");
    let query_params = drop_empty_keys(raw.query_params.unwrap_or_default(), "query parameter");
    let body = raw.body.and_then(normalize_body);

    debug!(
        method = %method,
        url = %url,
        headers = headers.len(),
        query_params = query_params.len(),
        body = ?body.as_ref().map(|b| if b.is_json() { "json" } else { "raw" }),
        "Request spec normalized"
    );

    Ok(RequestSpec {
        url: url.to_string(),
        parsed_url,
        method,
        headers,
        query_params,
        body,
    })
}

/// Parse a JSON document and normalize it.
///
/// Structural problems (not JSON, wrong field types) are validation errors too.
pub fn normalize_json(input: &str) -> Result<RequestSpec> {
    let raw: RawSpec = serde_json::from_str(input)
        .map_err(|e| ApisnipError::Validation(format!("invalid request spec: {}", e)))?;
    normalize(raw)
}

/// Same as [`normalize_json`] for an already-parsed document
pub fn normalize_value(input: Value) -> Result<RequestSpec> {
    let raw: RawSpec = serde_json::from_value(input)
        .map_err(|e| ApisnipError::Validation(format!("invalid request spec: {}", e)))?;
    normalize(raw)
}

fn parse_url(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(ApisnipError::Validation("url is required".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ApisnipError::Validation(format!("invalid url '{}': {}", url, e)))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(ApisnipError::Validation(format!(
            "invalid url '{}': a scheme and host are required",
            url
        ))),
    }
}

fn drop_empty_keys(map: ParamMap, what: &str) -> ParamMap {
    let before = map.len();
    let kept: ParamMap = map.into_iter().filter(|(k, _)| !k.is_empty()).collect();
    if kept.len() != before {
        debug!(dropped = before - kept.len(), "Dropped {} entries with an empty name", what);
    }
    kept
}

/// `None` when there is effectively no body
fn normalize_body(value: Value) -> Option<Body> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            if text.trim().is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(parsed) => Some(Body::Json { value: parsed, source: Some(text) }),
                Err(_) => Some(Body::Raw(text)),
            }
        }
        other => Some(Body::Json { value: other, source: None }),
    }
}

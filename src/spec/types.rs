//! Request spec data structures
//!
//! [`RawSpec`] is what callers send; [`RequestSpec`] is what generators read.
//! The only way to obtain a `RequestSpec` is [`super::normalize`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::http::Method;

/// Ordered, key-unique string mapping used for headers and query parameters
pub type ParamMap = IndexMap<String, String>;

/// Unvalidated input document as received at the boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSpec {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub headers: Option<ParamMap>,

    #[serde(default)]
    pub query_params: Option<ParamMap>,

    /// Any JSON value; strings are parsed as JSON during normalization
    #[serde(default)]
    pub body: Option<Value>,
}

/// One editable key/value row, as produced by form UIs and repeated CLI flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueRow {
    pub key: String,
    pub value: String,
}

impl KeyValueRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Parse `Name: value` (value may be empty)
    pub fn parse_header(s: &str) -> Result<Self, String> {
        let (name, value) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected 'Name: value'", s))?;
        Ok(Self::new(name.trim(), value.trim()))
    }

    /// Parse `name=value` (value may be empty)
    pub fn parse_query(s: &str) -> Result<Self, String> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("invalid query parameter '{}', expected 'name=value'", s))?;
        Ok(Self::new(name, value))
    }
}

/// Collapse rows into an ordered mapping.
///
/// A repeated key keeps the position of its first row and the value of its last.
pub fn project_rows<I>(rows: I) -> ParamMap
where
    I: IntoIterator<Item = KeyValueRow>,
{
    let mut map = ParamMap::new();
    for row in rows {
        map.insert(row.key, row.value);
    }
    map
}

/// Request body after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured JSON. `source` holds the original text when the caller sent a
    /// string that parsed as JSON.
    Json { value: Value, source: Option<String> },
    /// Opaque text that is not valid JSON; never pretty-printed
    Raw(String),
}

impl Body {
    pub fn is_json(&self) -> bool {
        matches!(self, Body::Json { .. })
    }
}

/// A validated, canonical description of one HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub(crate) url: String,
    pub(crate) parsed_url: Url,
    pub(crate) method: Method,
    pub(crate) headers: ParamMap,
    pub(crate) query_params: ParamMap,
    pub(crate) body: Option<Body>,
}

impl RequestSpec {
    /// The URL exactly as given (trimmed), without the spec's query params
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parsed_url(&self) -> &Url {
        &self.parsed_url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &ParamMap {
        &self.headers
    }

    pub fn query_params(&self) -> &ParamMap {
        &self.query_params
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

//! Postman Collection v2.1 generation
//!
//! Produces a single-request collection that Postman (and most tools that read
//! its format) can import. The collection id is derived from the request
//! itself, so identical specs always yield identical documents.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::escape::{append_query, canonical_json};
use crate::errors::{ApisnipError, Result};
use crate::spec::{Body, RequestSpec};

/// Schema URL identifying collection format v2.1.0
pub const SCHEMA_V2_1: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Collection name used when none is configured
pub const DEFAULT_COLLECTION_NAME: &str = "API Request Collection";

/// Root collection document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: CollectionInfo,
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(rename = "_postman_id")]
    pub postman_id: String,
    pub name: String,
    /// Format version tag
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub name: String,
    pub request: CollectionRequest,
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRequest {
    pub method: String,
    pub header: Vec<HeaderEntry>,
    pub url: CollectionUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<CollectionBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionUrl {
    pub raw: String,
    pub protocol: String,
    pub host: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub path: Vec<String>,
    pub query: Vec<QueryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionBody {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    pub raw: RawBodyOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBodyOptions {
    pub language: String,
}

impl PostmanCollection {
    /// Serialize to canonical JSON text
    pub fn to_canonical_json(&self) -> Result<String> {
        let value = serde_json::to_value(self)
            .map_err(|e| ApisnipError::Serialization(format!("collection is not serializable: {}", e)))?;
        canonical_json(&value)
    }
}

/// Generate a collection using the default name
pub fn generate_postman(spec: &RequestSpec) -> Result<PostmanCollection> {
    generate_postman_named(spec, DEFAULT_COLLECTION_NAME)
}

/// Generate a collection with an explicit name
pub fn generate_postman_named(spec: &RequestSpec, name: &str) -> Result<PostmanCollection> {
    let body = match spec.body() {
        Some(Body::Json { value, source }) => {
            let raw = match source {
                Some(text) => text.clone(),
                None => canonical_json(value)?,
            };
            Some(raw_body(raw, "json"))
        }
        Some(Body::Raw(text)) => Some(raw_body(text.clone(), "text")),
        None => None,
    };

    let header = spec
        .headers()
        .iter()
        .map(|(key, value)| HeaderEntry {
            key: key.clone(),
            value: value.clone(),
            kind: "text".to_string(),
        })
        .collect();

    let request = CollectionRequest {
        method: spec.method().to_string(),
        header,
        url: collection_url(spec),
        body,
    };

    Ok(PostmanCollection {
        info: CollectionInfo {
            postman_id: collection_id(spec)?.to_string(),
            name: name.to_string(),
            schema: SCHEMA_V2_1.to_string(),
        },
        item: vec![CollectionItem {
            name: format!("{} {}", spec.method(), spec.parsed_url().path()),
            request,
            response: Vec::new(),
        }],
    })
}

fn raw_body(raw: String, language: &str) -> CollectionBody {
    CollectionBody {
        mode: "raw".to_string(),
        raw,
        options: BodyOptions {
            raw: RawBodyOptions { language: language.to_string() },
        },
    }
}

fn collection_url(spec: &RequestSpec) -> CollectionUrl {
    let parsed = spec.parsed_url();

    let host = match parsed.host_str() {
        // IPv6 literals stay whole
        Some(h) if h.starts_with('[') => vec![h.to_string()],
        Some(h) => h.split('.').map(str::to_string).collect(),
        None => Vec::new(),
    };

    let path = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();

    let mut query: Vec<QueryEntry> = parsed
        .query_pairs()
        .map(|(key, value)| QueryEntry { key: key.into_owned(), value: value.into_owned() })
        .collect();
    query.extend(spec.query_params().iter().map(|(key, value)| QueryEntry {
        key: key.clone(),
        value: value.clone(),
    }));

    CollectionUrl {
        raw: append_query(spec.url(), spec.query_params()),
        protocol: parsed.scheme().to_string(),
        host,
        port: parsed.port().map(|p| p.to_string()),
        path,
        query,
    }
}

/// Name-based UUID over a stable fingerprint of the whole spec
fn collection_id(spec: &RequestSpec) -> Result<Uuid> {
    let body = match spec.body() {
        Some(Body::Json { value, source }) => json!({"json": value, "source": source}),
        Some(Body::Raw(text)) => json!({"raw": text}),
        None => serde_json::Value::Null,
    };

    let fingerprint = json!([
        spec.method().as_str(),
        spec.url(),
        spec.headers(),
        spec.query_params(),
        body,
    ]);

    let bytes = serde_json::to_vec(&fingerprint)
        .map_err(|e| ApisnipError::Serialization(format!("cannot fingerprint request: {}", e)))?;
    Ok(Uuid::new_v5(&Uuid::NAMESPACE_URL, &bytes))
}

//! Generation facade: one spec in, all four formats out

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::curl::generate_curl;
use super::javascript::generate_javascript;
use super::postman::{generate_postman_named, PostmanCollection, DEFAULT_COLLECTION_NAME};
use super::python::generate_python;
use crate::errors::{ApisnipError, Result};
use crate::spec::{normalize, RawSpec, RequestSpec};

/// Knobs that are not part of the request itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// `info.name` of the generated collection
    pub collection_name: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

/// Every representation of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBundle {
    #[serde(rename = "curl")]
    pub command: String,
    #[serde(rename = "python")]
    pub script: String,
    #[serde(rename = "javascript")]
    pub program: String,
    #[serde(rename = "postman_collection")]
    pub collection: PostmanCollection,
}

/// Normalize a raw spec and generate the bundle
pub fn generate(raw: RawSpec, options: &CodegenOptions) -> Result<GeneratedBundle> {
    let spec = normalize(raw)?;
    generate_bundle_with(&spec, options)
}

/// Generate the bundle with default options
pub fn generate_bundle(spec: &RequestSpec) -> Result<GeneratedBundle> {
    generate_bundle_with(spec, &CodegenOptions::default())
}

/// Run the four generators one after another.
///
/// Fails as a whole if any generator fails; there is no partial bundle.
pub fn generate_bundle_with(spec: &RequestSpec, options: &CodegenOptions) -> Result<GeneratedBundle> {
    let started = Instant::now();

    let bundle = GeneratedBundle {
        command: generate_curl(spec)?,
        script: generate_python(spec)?,
        program: generate_javascript(spec)?,
        collection: generate_postman_named(spec, &options.collection_name)?,
    };

    debug!(
        method = %spec.method(),
        url = %spec.url(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "Bundle generated"
    );
    Ok(bundle)
}

/// Same result as [`generate_bundle_with`], with each generator on its own thread
pub fn generate_bundle_concurrent(spec: &RequestSpec, options: &CodegenOptions) -> Result<GeneratedBundle> {
    let (command, script, program, collection) = std::thread::scope(|scope| {
        let command = scope.spawn(|| generate_curl(spec));
        let script = scope.spawn(|| generate_python(spec));
        let program = scope.spawn(|| generate_javascript(spec));
        let collection = scope.spawn(|| generate_postman_named(spec, &options.collection_name));
        (join(command), join(script), join(program), join(collection))
    });

    Ok(GeneratedBundle {
        command: command?,
        script: script?,
        program: program?,
        collection: collection?,
    })
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .map_err(|_| ApisnipError::Serialization("generator thread panicked".to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::normalize_value;
    use serde_json::json;

    fn spec() -> RequestSpec {
        normalize_value(json!({
            "url": "https://api.example.com/items",
            "method": "POST",
            "headers": {"Content-Type": "application/json"},
            "query_params": {"page": "1"},
            "body": {"name": "x"}
        })).unwrap()
    }

    #[test]
    fn test_bundle_is_deterministic() {
        let a = serde_json::to_string(&generate_bundle(&spec()).unwrap()).unwrap();
        let b = serde_json::to_string(&generate_bundle(&spec()).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let options = CodegenOptions::default();
        let sequential = generate_bundle_with(&spec(), &options).unwrap();
        let concurrent = generate_bundle_concurrent(&spec(), &options).unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_boundary_field_names() {
        let value = serde_json::to_value(generate_bundle(&spec()).unwrap()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["curl", "python", "javascript", "postman_collection"]);
    }

    #[test]
    fn test_generate_rejects_before_generating() {
        let raw = RawSpec {
            url: Some("nope".into()),
            method: Some("GET".into()),
            ..Default::default()
        };
        let err = generate(raw, &CodegenOptions::default()).unwrap_err();
        assert!(matches!(err, ApisnipError::Validation(_)));
    }

    #[test]
    fn test_collection_name_option() {
        let options = CodegenOptions { collection_name: "Items API".into() };
        let bundle = generate_bundle_with(&spec(), &options).unwrap();
        assert_eq!(bundle.collection.info.name, "Items API");
    }
}

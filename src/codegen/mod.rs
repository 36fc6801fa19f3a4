//! Snippet generation
//!
//! Every generator is a pure function of a [`RequestSpec`]:
//!
//! - [`curl`] - curl command line
//! - [`python`] - Python program using `requests`
//! - [`javascript`] - JavaScript program using async `fetch`
//! - [`postman`] - Postman Collection v2.1 document
//!
//! [`bundle`] runs all four; [`generate_format`] runs one.

pub mod bundle;
pub mod curl;
pub mod escape;
pub mod javascript;
pub mod postman;
pub mod python;

pub use bundle::{
    generate, generate_bundle, generate_bundle_concurrent, generate_bundle_with, CodegenOptions,
    GeneratedBundle,
};
pub use curl::generate_curl;
pub use javascript::generate_javascript;
pub use postman::{generate_postman, generate_postman_named, PostmanCollection};
pub use python::generate_python;

use crate::errors::Result;
use crate::spec::RequestSpec;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Curl,
    Python,
    Javascript,
    Postman,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Curl => "curl",
            Format::Python => "python",
            Format::Javascript => "javascript",
            Format::Postman => "postman",
        }
    }
}

/// Generate a single format as text (the collection as canonical JSON)
pub fn generate_format(format: Format, spec: &RequestSpec, options: &CodegenOptions) -> Result<String> {
    match format {
        Format::Curl => generate_curl(spec),
        Format::Python => generate_python(spec),
        Format::Javascript => generate_javascript(spec),
        Format::Postman => generate_postman_named(spec, &options.collection_name)?.to_canonical_json(),
    }
}

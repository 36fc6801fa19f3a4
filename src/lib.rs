//! apisnip library interface
//!
//! Turns one HTTP request description into ready-to-run snippets: a curl
//! command, a Python `requests` script, a JavaScript `fetch` program and a
//! Postman Collection v2.1 document.
//!
//! # Module Organization
//!
//! - [`spec`] - Request spec types and normalization
//! - [`codegen`] - Snippet generators and the bundle
//! - [`server`] - HTTP host for the generator
//! - [`errors`] - Error types (ApisnipError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod cli;
pub mod codegen;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod http;
pub mod server;
pub mod spec;
pub mod status;

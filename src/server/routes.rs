//! Route dispatch for the generator HTTP host
//!
//! | Method    | Path                  | Response                          |
//! |-----------|-----------------------|-----------------------------------|
//! | `GET`     | `/api/health`         | 200 health document               |
//! | `POST`    | `/api/generate-code`  | 200 bundle, 422 invalid, 500 fail |
//! | `OPTIONS` | any                   | 204 (CORS preflight)              |

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::codegen::{generate_bundle_with, CodegenOptions};
use crate::errors::{ApisnipError, Result};
use crate::spec::normalize_json;

pub const HEALTH_PATH: &str = "/api/health";
pub const GENERATE_PATH: &str = "/api/generate-code";

/// Parsed HTTP request
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Lowercased header names
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

/// HTTP response ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// JSON response; a value that fails to serialize becomes a 500
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::json_bytes(status, body),
            Err(e) => {
                warn!(error = %e, "Response serialization failed");
                Self::json_bytes(500, br#"{"detail":"Internal Server Error"}"#.to_vec())
            }
        }
    }

    fn json_bytes(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }

    pub fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self::json(status, &json!({ "detail": detail.into() }))
    }

    pub fn empty(status: u16) -> Self {
        Self { status, headers: Vec::new(), body: Vec::new() }
    }

    /// Serialize status line, headers and body
    pub fn to_bytes(&self, cors: bool) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, http_status_text(self.status));

        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        if cors {
            head.push_str("Access-Control-Allow-Origin: *\r\n");
            head.push_str("Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n");
            head.push_str("Access-Control-Allow-Headers: *\r\n");
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

/// Route a request to its handler
pub fn dispatch(request: &Request, options: &CodegenOptions) -> Response {
    if request.method.eq_ignore_ascii_case("OPTIONS") {
        return Response::empty(204);
    }

    match (request.method.to_ascii_uppercase().as_str(), request.path.as_str()) {
        ("GET", HEALTH_PATH) => Response::json(
            200,
            &json!({"message": "API Code Generator is running", "status": "healthy"}),
        ),
        ("POST", GENERATE_PATH) => generate_code(&request.body, options),
        (_, HEALTH_PATH) | (_, GENERATE_PATH) => Response::detail(405, "Method Not Allowed"),
        _ => Response::detail(404, "Not Found"),
    }
}

fn generate_code(body: &[u8], options: &CodegenOptions) -> Response {
    let text = match std::str::from_utf8(body) {
        Ok(text) => text,
        Err(_) => return Response::detail(422, "request body is not valid UTF-8"),
    };

    match generate_value(text, options) {
        Ok(value) => Response::json(200, &value),
        Err(e) if e.is_client_error() => Response::detail(422, e.detail()),
        Err(e) => {
            warn!(error = %e, "Code generation failed");
            Response::detail(500, format!("Error generating code: {}", e.detail()))
        }
    }
}

fn generate_value(text: &str, options: &CodegenOptions) -> Result<serde_json::Value> {
    let spec = normalize_json(text)?;
    let bundle = generate_bundle_with(&spec, options)?;
    serde_json::to_value(bundle)
        .map_err(|e| ApisnipError::Serialization(format!("bundle is not serializable: {}", e)))
}

/// Get HTTP status text
pub fn http_status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        411 => "Length Required",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

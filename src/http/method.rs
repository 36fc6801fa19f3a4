//! HTTP methods accepted in a request spec

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP GET method
pub const GET: &str = "GET";

/// HTTP POST method
pub const POST: &str = "POST";

/// HTTP PUT method
pub const PUT: &str = "PUT";

/// HTTP DELETE method
pub const DELETE: &str = "DELETE";

/// HTTP PATCH method
pub const PATCH: &str = "PATCH";

/// All methods a spec may use
pub const SUPPORTED_METHODS: &[&str] = &[GET, POST, PUT, DELETE, PATCH];

/// Closed set of methods a request spec may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => GET,
            Method::Post => POST,
            Method::Put => PUT,
            Method::Delete => DELETE,
            Method::Patch => PATCH,
        }
    }

    /// GET is the default for most clients and can be left implicit
    pub fn is_default(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            GET => Ok(Method::Get),
            POST => Ok(Method::Post),
            PUT => Ok(Method::Put),
            DELETE => Ok(Method::Delete),
            PATCH => Ok(Method::Patch),
            other => Err(format!(
                "unsupported method '{}', expected one of {}",
                other,
                SUPPORTED_METHODS.join(", ")
            )),
        }
    }
}

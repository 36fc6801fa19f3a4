//! Curl command generation
//!
//! Renders a request spec as a curl invocation, one option per line:
//!
//! ```text
//! curl \
//!   -X POST \
//!   -H 'Content-Type: application/json' \
//!   'https://api.example.com/items?page=1' \
//!   --data '{
//!   "name": "x"
//! }'
//! ```

use super::escape::{append_query, canonical_json, shell_quote};
use crate::errors::Result;
use crate::spec::{Body, RequestSpec};

/// Joins the segments of the command
const LINE_CONTINUATION: &str = " \\\n  ";

/// Generate an equivalent curl command from the request
pub fn generate_curl(spec: &RequestSpec) -> Result<String> {
    let mut parts: Vec<String> = vec!["curl".to_string()];

    // GET is curl's default, but --data alone switches curl to POST
    if !spec.method().is_default() || spec.body().is_some() {
        parts.push(format!("-X {}", spec.method()));
    }

    for (name, value) in spec.headers() {
        parts.push(format!("-H {}", shell_quote(&format!("{}: {}", name, value))));
    }

    parts.push(shell_quote(&append_query(spec.url(), spec.query_params())));

    match spec.body() {
        Some(Body::Json { value, .. }) => {
            parts.push(format!("--data {}", shell_quote(&canonical_json(value)?)));
        }
        Some(Body::Raw(text)) => {
            parts.push(format!("--data {}", shell_quote(text)));
        }
        None => {}
    }

    Ok(parts.join(LINE_CONTINUATION))
}

//! Request specs
//!
//! Callers describe a request with a [`RawSpec`] (usually deserialized from
//! JSON). [`normalize`] validates it and produces the immutable [`RequestSpec`]
//! every generator works from:
//!
//! ```text
//! {"url": "https://api.example.com/items", "method": "post",
//!  "headers": {"Content-Type": "application/json"}, "body": "{\"name\": \"x\"}"}
//!     -> RequestSpec { method: POST, body: Json { .. }, .. }
//! ```

pub mod normalize;
pub mod types;

pub use normalize::{normalize, normalize_json, normalize_value};
pub use types::{project_rows, Body, KeyValueRow, ParamMap, RawSpec, RequestSpec};

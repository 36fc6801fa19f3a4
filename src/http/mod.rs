//! HTTP protocol types and constants
//!
//! The closed set of request methods a spec may name.

mod method;

pub use method::*;

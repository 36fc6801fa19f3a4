//! Built-in HTTP host
//!
//! Exposes the generator over HTTP for web front ends:
//!
//! ```bash
//! apisnip serve --port 8000
//! curl -X POST localhost:8000/api/generate-code \
//!   -d '{"url": "https://api.example.com/items", "method": "GET"}'
//! ```

pub mod routes;
pub mod server;

pub use routes::{dispatch, Request, Response, GENERATE_PATH, HEALTH_PATH};
pub use server::{run_server, GeneratorServer, MAX_BODY_BYTES};

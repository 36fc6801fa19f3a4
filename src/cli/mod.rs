//! CLI argument parsing

pub mod args;

// Re-exports
pub use args::{Args, Command, GenerateArgs, LogFormat, OutputFormat, ServeArgs};

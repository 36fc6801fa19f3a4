//! Configuration

#[allow(clippy::module_inception)]
mod config;

pub use config::{CollectionConfig, Config, ServerConfig, CONFIG_DIR_ENV};

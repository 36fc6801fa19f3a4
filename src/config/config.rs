//! Config file handling

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::postman::DEFAULT_COLLECTION_NAME;
use crate::codegen::CodegenOptions;
use crate::errors::ApisnipError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "APISNIP_CONFIG_DIR";

/// HTTP host settings (`[server]`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Send permissive CORS headers
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Get address string
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Collection document settings (`[collection]`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub name: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { name: DEFAULT_COLLECTION_NAME.to_string() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DefaultsSection {
    options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    defaults: DefaultsSection,
    server: ServerConfig,
    collection: CollectionConfig,
}

/// apisnip configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Flags prepended to every invocation
    pub default_options: Vec<String>,
    pub server: ServerConfig,
    pub collection: CollectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            default_options: Vec::new(),
            server: ServerConfig::default(),
            collection: CollectionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file (TOML format)
    pub fn load() -> Result<Self, ApisnipError> {
        Self::load_from_dir(Self::default_config_dir())
    }

    /// Load `config.toml` from a specific directory; a missing file means defaults
    pub fn load_from_dir(config_dir: PathBuf) -> Result<Self, ApisnipError> {
        let config_file = config_dir.join("config.toml");

        if !config_file.exists() {
            return Ok(Self { config_dir, ..Self::default() });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| ApisnipError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content, &config_dir)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str, config_dir: &Path) -> Result<Self, ApisnipError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| ApisnipError::Config(format!("Invalid config TOML: {}", e)))?;

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            default_options: file.defaults.options,
            server: file.server,
            collection: file.collection,
        })
    }

    /// Generator options derived from this config
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions { collection_name: self.collection.name.clone() }
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("apisnip"))
            .unwrap_or_else(|| PathBuf::from(".apisnip"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("", Path::new("/tmp/apisnip")).unwrap();
        assert!(config.default_options.is_empty());
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.server.address(), "127.0.0.1:8000");
        assert!(config.server.cors);
        assert_eq!(config.collection.name, DEFAULT_COLLECTION_NAME);
    }

    #[test]
    fn test_full_file() {
        let toml = r#"
[defaults]
options = ["--log-format", "json"]

[server]
host = "0.0.0.0"
port = 9000
cors = false

[collection]
name = "Team Requests"
"#;
        let config = Config::from_toml(toml, Path::new("/tmp/apisnip")).unwrap();
        assert_eq!(config.default_options, vec!["--log-format", "json"]);
        assert_eq!(config.server.address(), "0.0.0.0:9000");
        assert!(!config.server.cors);
        assert_eq!(config.codegen_options().collection_name, "Team Requests");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[server]\nport = 1234\n", Path::new("/tmp")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 1234);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[server\nport = ", Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, ApisnipError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[collection]\nname = \"From Disk\"\n").unwrap();
        let config = Config::load_from_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(config.collection.name, "From Disk");
    }
}

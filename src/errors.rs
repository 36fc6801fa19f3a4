//! Error types for apisnip

use thiserror::Error;

/// Main error type for apisnip
#[derive(Error, Debug)]
pub enum ApisnipError {
    /// The input could not be turned into a request spec. Nothing is generated.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A body value could not be formatted as canonical JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl ApisnipError {
    /// Human-readable detail without the category prefix.
    ///
    /// Used for the `detail` field of HTTP error responses.
    pub fn detail(&self) -> String {
        match self {
            ApisnipError::Validation(msg)
            | ApisnipError::Serialization(msg)
            | ApisnipError::Config(msg)
            | ApisnipError::Argument(msg)
            | ApisnipError::Server(msg) => msg.clone(),
            ApisnipError::Io(e) => e.to_string(),
            ApisnipError::Json(e) => e.to_string(),
        }
    }

    /// Whether the caller sent bad input (as opposed to an internal failure)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApisnipError::Validation(_) | ApisnipError::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, ApisnipError>;

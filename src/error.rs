use std::path::Path;
use thiserror::Error;

/// Main error type for the schemagen system
#[derive(Error, Debug)]
pub enum SchemaGenError {
    #[error("Failed to load OpenAPI schemas from {path}: {message}")]
    Load { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type SchemaGenResult<T> = Result<T, SchemaGenError>;

impl SchemaGenError {
    pub fn load(path: impl AsRef<Path>, cause: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.as_ref().display().to_string(),
            message: cause.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}

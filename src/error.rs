// src/error.rs

//! Unified error handling for catalog ingestion and listing.

use std::fmt;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Scraped content could not be parsed into a catalog
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A metadata tag is absent
    #[error("Metadata field '{0}' not found")]
    MissingField(&'static str),

    /// A metadata tag is present but does not decode
    #[error("Metadata field '{field}' is malformed: {message}")]
    MalformedField {
        field: &'static str,
        message: String,
    },

    /// The store has no object under the key
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Listing, head or get against the store failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Put against the store failed
    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    /// The request deadline elapsed
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl fmt::Display) -> Self {
        Self::InvalidInput(message.to_string())
    }

    /// Create a malformed field error.
    pub fn malformed(field: &'static str, message: impl fmt::Display) -> Self {
        Self::MalformedField {
            field,
            message: message.to_string(),
        }
    }

    /// Create a storage unavailable error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::StorageUnavailable(message.to_string())
    }

    /// Create a storage write error.
    pub fn storage_write(message: impl fmt::Display) -> Self {
        Self::StorageWrite(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Reclassify a failed listing, head or get as a storage failure.
    ///
    /// Covers objects vanishing between listing and head.
    pub fn into_storage_unavailable(self) -> Self {
        match self {
            Self::StorageUnavailable(_) => self,
            other => Self::storage(other),
        }
    }

    /// Reclassify a failed put as a write failure.
    pub fn into_storage_write(self) -> Self {
        match self {
            Self::StorageWrite(_) => self,
            other => Self::storage_write(other),
        }
    }

    /// Whether the caller caused this failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

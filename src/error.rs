//! Error handling for the storage console
//!
//! This module defines the error types used throughout the library.
//! Uploader failures are carried as opaque messages so they can be shown
//! to the user verbatim.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Error types that can occur when driving an upload
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A required input was missing or malformed
    #[error("Validation failed: {parameter} - {message}")]
    ValidationError { parameter: String, message: String },

    /// Upload failed in the external uploader
    #[error("{message}")]
    UploadError { message: String },

    /// The operation is not allowed in the current upload phase
    #[error("Cannot {operation} while {status}")]
    InvalidState { operation: String, status: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Create a new validation error
    pub fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::ValidationError {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new upload error
    pub fn upload_error(message: impl Into<String>) -> Self {
        ConsoleError::UploadError {
            message: message.into(),
        }
    }

    /// Create a new invalid state error
    pub fn invalid_state(operation: impl Into<String>, status: impl ToString) -> Self {
        ConsoleError::InvalidState {
            operation: operation.into(),
            status: status.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ConsoleError::ConfigError {
            message: message.into(),
        }
    }

    /// The message shown to the user when an upload fails
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::UploadError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl Clone for ConsoleError {
    fn clone(&self) -> Self {
        match self {
            ConsoleError::ValidationError { parameter, message } => ConsoleError::ValidationError {
                parameter: parameter.clone(),
                message: message.clone(),
            },
            ConsoleError::UploadError { message } => ConsoleError::UploadError {
                message: message.clone(),
            },
            ConsoleError::InvalidState { operation, status } => ConsoleError::InvalidState {
                operation: operation.clone(),
                status: status.clone(),
            },
            ConsoleError::ConfigError { message } => ConsoleError::ConfigError {
                message: message.clone(),
            },
            ConsoleError::Io(e) => ConsoleError::Io(std::io::Error::new(e.kind(), e.to_string())),
            ConsoleError::Json(e) => ConsoleError::config_error(format!("JSON error: {}", e)),
        }
    }
}

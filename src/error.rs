//! Custom error types for research-assistant.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, AssistantError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for research-assistant operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code from API
        code: i32,
        /// Error message from API
        message: String,
    },

    /// Generative-model call failure
    #[error("Model error: {0}")]
    Model(String),

    /// Archive database error
    #[error("Archive error: {0}")]
    Archive(#[from] rusqlite::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `AssistantError`
pub type Result<T> = std::result::Result<T, AssistantError>;

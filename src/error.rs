// src/error.rs

//! Unified error handling for the leaderboard job.

use thiserror::Error;

/// Result type alias for rootboard operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A username resolved to no account
    #[error("Could not find user with name: {0}")]
    NotFound(String),

    /// A username resolved to several exact matches
    #[error("Found {count} users with name: {name}")]
    AmbiguousUser { name: String, count: usize },

    /// The challenge API answered with an error descriptor
    #[error("Remote API error: {0}")]
    Remote(String),

    /// The webhook answered without a message id
    #[error("Webhook post failed: {0}")]
    Post(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a remote API error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Create a webhook post error.
    pub fn post(message: impl Into<String>) -> Self {
        Self::Post(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

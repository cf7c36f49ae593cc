// src/error.rs

//! Unified error handling for the monitor.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
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

    /// Mail message could not be assembled
    #[error("Mail build error: {0}")]
    MailBuild(#[from] lettre::error::Error),

    /// Mail address could not be parsed
    #[error("Mail address error: {0}")]
    MailAddress(#[from] lettre::address::AddressError),

    /// SMTP submission failed
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page load exceeded its deadline
    #[error("Timeout after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    /// Fetch failed for a reason other than a timeout
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The fetch resource could not be acquired
    #[error("Fetch resource unavailable: {0}")]
    Resource(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with the offending URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a resource acquisition error.
    pub fn resource(message: impl fmt::Display) -> Self {
        Self::Resource(message.to_string())
    }

    /// Whether this error should abort a whole run rather than a single target.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Resource(_)
                | Self::Config(_)
                | Self::Smtp(_)
                | Self::MailBuild(_)
                | Self::MailAddress(_)
                | Self::Io(_)
        )
    }
}

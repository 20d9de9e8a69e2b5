//! Error module for the Kona filters tool.
//!
//! Library code reports [`FilterError`](crate::filters::FilterError); this
//! module wraps it together with configuration, I/O and serialization failures
//! for the command-line layer.

use thiserror::Error;

use crate::filters::FilterError;

pub mod config;

/// Result type alias used by the application layer.
pub type KonaResult<T> = Result<T, KonaError>;

/// Core error enum for the application layer.
#[derive(Error, Debug)]
pub enum KonaError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by a filter.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML serialization errors.
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

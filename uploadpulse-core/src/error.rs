//! Error types for uploadpulse-core

use thiserror::Error;

/// Main error type for the uploadpulse-core library
///
/// Malformed upload records are not errors: the normalizer drops them and
/// counts them instead. Only caller contract violations and the I/O edges
/// (config, input files) surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A window or calendar was requested for a date that cannot be parsed
    /// or represented
    #[error("invalid window request: {0}")]
    InvalidWindow(String),
}

/// Result type alias for uploadpulse-core
pub type Result<T> = std::result::Result<T, Error>;

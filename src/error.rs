// Error types for certwatch
//
// Structured error types using thiserror. Library modules return these through
// their module-level `Result` aliases; the command layer lifts them into anyhow.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for certwatch operations
#[derive(Debug, Error)]
pub enum WatchError {
    /// A keyword list file could not be read
    #[error("Failed to read keyword file {path}: {source}")]
    KeywordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A keyword pattern failed to compile
    #[error("Invalid pattern {pattern:?} in {path}:{line}: {source}")]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The record log file could not be opened
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: io::Error,
    },

    /// A certificate event could not be decoded
    #[error("Decode error: {message}")]
    DecodeError { message: String },

    /// The certificate stream reported a transport failure
    #[error("Certificate stream error: {0}")]
    StreamError(#[from] tokio_tungstenite::tungstenite::Error),

    /// The certificate stream delivered a frame that is not valid JSON
    #[error("Invalid stream frame: {0}")]
    FrameError(#[source] serde_json::Error),

    /// The certificate stream sent nothing, not even a heartbeat, for too long
    #[error("Certificate stream idle for {idle:?}, reconnecting")]
    IdleTimeout { idle: std::time::Duration },

    /// HTTP client error
    #[error("HTTP error (status {status}): {details}")]
    HttpError { status: u16, details: String },

    /// Reqwest HTTP client errors
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// A notification was rejected by the delivery service
    #[error("Notification rejected by {channel}: {details}")]
    NotificationRejected { channel: String, details: String },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// TOML configuration parse errors
    #[error("Failed to parse TOML config: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type for certwatch library operations
pub type Result<T> = std::result::Result<T, WatchError>;

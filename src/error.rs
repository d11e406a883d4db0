//! Error types for jsonkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using JsonKvError
pub type Result<T> = std::result::Result<T, JsonKvError>;

/// Unified error type for jsonkv operations
#[derive(Debug, Error)]
pub enum JsonKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    /// Invalid call arguments, detected before any bytes are sent
    #[error("Usage error: {0}")]
    Usage(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// Failure reported by the server (non-resolving path, violated
    /// existence condition)
    #[error("Server error: {0}")]
    Server(String),

    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// Malformed frame or an unrecognized reply payload
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Error types for fm-core

use thiserror::Error;

/// Core error type for Forma
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Unknown warehouse kind
    #[error("[E004] Unknown warehouse '{name}'. Supported warehouses: {supported}")]
    UnknownWarehouse { name: String, supported: String },

    /// E005: Binary message could not be encoded
    #[error("[E005] Failed to encode {message_type}: {details}")]
    Encode {
        message_type: &'static str,
        details: String,
    },

    /// E006: Binary message could not be decoded
    #[error("[E006] Failed to decode {message_type}: {details}")]
    Decode {
        message_type: &'static str,
        details: String,
    },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

//! Error types for fm-db

use thiserror::Error;

/// Warehouse connector errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Warehouse connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Not implemented (D003)
    #[error("[D003] Feature not implemented for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },

    /// The call was cancelled before it produced a result (D004)
    #[error("[D004] Query cancelled")]
    Cancelled,

    /// Credentials do not belong to the requested warehouse (D005)
    #[error("[D005] {credentials} credentials cannot connect to a {warehouse} warehouse")]
    CredentialsMismatch {
        credentials: String,
        warehouse: String,
    },

    /// Mutex poisoned (D006)
    #[error("[D006] Connection mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D007)
    #[error("[D007] Internal warehouse error: {0}")]
    Internal(String),

    /// Credentials could not be read or parsed (D008)
    #[error("[D008] Invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub(crate) fn not_implemented(backend: &str, feature: &str) -> Self {
        DbError::NotImplemented {
            backend: backend.to_string(),
            feature: feature.to_string(),
        }
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

//! Error types for fm-query

use fm_compile::CompileError;
use fm_db::DbError;
use thiserror::Error;

/// Query pipeline errors.
///
/// Cancellation is not an error; it is reported as `Outcome::Cancelled`.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Compiling the query failed (Q001)
    #[error("[Q001] Compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// The warehouse rejected a call (Q002)
    #[error("[Q002] {0}")]
    Database(#[from] DbError),

    /// An assertion found violating rows (Q003)
    #[error("[Q003] Assertion failed with {row_count} violating row(s): {sql}")]
    AssertionFailed { sql: String, row_count: i64 },

    /// The assertion check returned something other than a row count (Q004)
    #[error("[Q004] Assertion check returned no usable row_count: {sql}")]
    InvalidAssertionResult { sql: String },

    /// The spawned pipeline task panicked or was aborted (Q005)
    #[error("[Q005] Query task failed: {0}")]
    TaskJoin(String),
}

/// Result type alias for QueryError
pub type QueryResult<T> = Result<T, QueryError>;

//! Error types for fm-compile

use fm_core::CoreError;
use fm_jinja::JinjaError;
use thiserror::Error;

/// Compilation errors
#[derive(Error, Debug)]
pub enum CompileError {
    /// C001: Malformed bootstrap program line
    #[error("[C001] Bootstrap program syntax error on line {line}: {message}")]
    ProgramSyntax { line: usize, message: String },

    /// C002: Program uses a module other than `core`
    #[error("[C002] Module '{module}' is not available in the compile sandbox; only 'core' may be used")]
    ForbiddenModule { module: String },

    /// C003: Program runs a directive before `use core`
    #[error("[C003] '{directive}' requires 'use core' first")]
    CoreNotLoaded { directive: String },

    /// C004: Path is absolute or leaves the project root
    #[error("[C004] Path '{path}' escapes the project root")]
    PathEscapesRoot { path: String },

    /// C005: Directive needs state an earlier directive provides
    #[error("[C005] '{directive}' requires {requirement}")]
    OutOfOrder {
        directive: String,
        requirement: &'static str,
    },

    /// C006: Program finished without a return
    #[error("[C006] Bootstrap program has no return directive")]
    MissingReturn,

    /// C007: Definition or include file could not be read
    #[error("[C007] Failed to read '{path}': {source}")]
    SourceRead {
        path: String,
        source: std::io::Error,
    },

    /// C008: Definition file with an unsupported extension
    #[error("[C008] Unsupported definition file '{path}'; expected .sql or .sqlx")]
    UnsupportedDefinition { path: String },

    /// C009: Two definitions declare the same name
    #[error("[C009] Duplicate unit name '{name}' (first defined in {first_path})")]
    DuplicateName { name: String, first_path: String },

    /// C010: Compile config carries no project directory
    #[error("[C010] Compile config has no project directory")]
    MissingProjectDir,

    /// C011: Project directory could not be resolved
    #[error("[C011] Project directory '{path}' is not accessible: {source}")]
    ProjectDir {
        path: String,
        source: std::io::Error,
    },

    /// C012: Source discovery failed
    #[error("[C012] Failed to discover project files: {message}")]
    Discovery { message: String },

    /// C013: Compile worker executable not found
    #[error("[C013] Compile worker not found at '{path}'. Set FORMA_COMPILE_WORKER to its location")]
    WorkerNotFound { path: String },

    /// C014: Compile worker could not be started or talked to
    #[error("[C014] Failed to run compile worker: {0}")]
    WorkerIo(#[source] std::io::Error),

    /// C015: Compile worker exited unsuccessfully
    #[error("[C015] Compile worker failed ({status}): {stderr}")]
    WorkerFailed { status: String, stderr: String },

    /// C016: Compile worker produced unreadable output
    #[error("[C016] Invalid compile worker output: {message}")]
    WorkerOutput { message: String },

    /// Template error
    #[error(transparent)]
    Jinja(#[from] JinjaError),

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for CompileError
pub type CompileResult<T> = Result<T, CompileError>;

//! fm-query - Query execution pipeline for Forma
//!
//! Compiles an ad-hoc query against a project, opens a connector for the
//! requested warehouse and runs the result, with cancellation observed at
//! every step. Also runs adapter task plans against a connector.

pub mod error;
pub mod execution;
pub mod query;

pub use error::{QueryError, QueryResult};
pub use execution::{execute_tasks, publish_table, run_assertion, TaskReport};
pub use fm_compile::{compile, CompileOrchestrator};
pub use query::{evaluate, evaluate_with, run, CancellableQuery, Outcome, QueryOptions};

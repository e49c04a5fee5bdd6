//! fm-compile - Compilation for Forma
//!
//! A project is compiled in a separate `fm-compile-worker` process. The
//! orchestrator sends it a base64 [`CompileConfig`](fm_core::CompileConfig);
//! the worker discovers the project's files, generates a bootstrap program,
//! runs it in a [`Sandbox`] and prints the result.

pub mod bootstrap;
pub mod error;
pub mod orchestrator;
pub mod program;
pub mod sandbox;
pub mod session;
pub mod worker;

pub use bootstrap::{build_program, generate_index};
pub use error::{CompileError, CompileResult};
pub use orchestrator::{compile, CompileOrchestrator, WORKER_ENV_VAR};
pub use program::{Directive, Program, ReturnExpr};
pub use sandbox::Sandbox;
pub use session::Session;
pub use worker::run_worker;

//! fm-jinja - Jinja templating layer for Forma
//!
//! Definitions and ad-hoc queries are minijinja templates. This crate
//! provides the environment they are rendered in, with `config()`, `ref()`,
//! `resolve()`, `self()`, `var()` and `is_incremental()`, and turns the
//! captured `config()` keyword arguments into a typed [`UnitConfig`].

pub mod config;
pub mod environment;
pub mod error;
pub mod functions;

pub use config::{DeclaredType, UnitConfig};
pub use environment::{JinjaEnvironment, RenderOptions, Rendered};
pub use error::{JinjaError, JinjaResult};

//! fm-core - Core library for Forma
//!
//! This crate provides the data model shared by every Forma component:
//! targets, tables, assertions, warehouse metadata, ordered task plans,
//! project configuration, and the binary message codec used across the
//! compile worker boundary.

pub mod assertion;
pub mod codec;
pub mod compile_config;
pub mod config;
pub mod error;
pub mod graph;
pub mod metadata;
pub mod sql_utils;
pub mod table;
pub mod target;
pub mod task;
pub mod warehouse;

pub use assertion::Assertion;
pub use compile_config::{CompileConfig, GenerateIndexConfig};
pub use config::{ProjectConfig, ProjectConfigOverride, RunConfig};
pub use error::{CoreError, CoreResult};
pub use graph::{CompilationError, CompiledGraph};
pub use metadata::{Field, TableMetadata};
pub use table::{ObjectKind, RedshiftOptions, SnowflakeOptions, Table, TableType};
pub use target::Target;
pub use task::{Task, TaskKind, Tasks};
pub use warehouse::WarehouseKind;

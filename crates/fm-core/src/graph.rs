//! The compiled project graph returned by the compile worker.

use crate::assertion::Assertion;
use crate::codec::{decode_base64, encode_base64};
use crate::config::ProjectConfig;
use crate::error::CoreResult;
use crate::table::Table;
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// A definition or include file that failed to load or compile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationError {
    /// File path relative to the project root
    pub path: String,
    /// Error text
    pub message: String,
}

impl CompilationError {
    /// Create a new compilation error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompilationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every table and assertion of a project, plus per-file failures.
///
/// A graph with compile errors is still usable: the failing files are simply
/// missing from `tables`/`assertions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompiledGraph {
    /// Merged project configuration the graph was compiled with
    pub project_config: ProjectConfig,
    /// Tables and views, in definition order
    pub tables: Vec<Table>,
    /// Assertions, in definition order
    pub assertions: Vec<Assertion>,
    /// Files that failed, in the order they failed
    pub compile_errors: Vec<CompilationError>,
}

impl CompiledGraph {
    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Look up an assertion by name
    pub fn assertion(&self, name: &str) -> Option<&Assertion> {
        self.assertions.iter().find(|a| a.name == name)
    }

    /// Every target in the graph (tables first, then assertions)
    pub fn targets(&self) -> Vec<Target> {
        self.tables
            .iter()
            .map(|t| t.target.clone())
            .chain(
                self.assertions
                    .iter()
                    .map(|a| a.resolved_target(&self.project_config)),
            )
            .collect()
    }

    /// Returns true when no file failed
    pub fn is_clean(&self) -> bool {
        self.compile_errors.is_empty()
    }

    /// Encode as base64 text for the worker's stdout
    pub fn to_base64(&self) -> CoreResult<String> {
        encode_base64(self, "CompiledGraph")
    }

    /// Decode from base64 text produced by [`to_base64`](Self::to_base64)
    pub fn from_base64(encoded: &str) -> CoreResult<Self> {
        decode_base64(encoded, "CompiledGraph")
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;

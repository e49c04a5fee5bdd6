//! Data-quality assertions.

use crate::config::ProjectConfig;
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// A named query whose rows are violations.
///
/// Compiled into a view plus a row-count check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Assertion name
    pub name: String,
    /// Explicit target for the assertion view
    #[serde(default)]
    pub target: Option<Target>,
    /// Query selecting violating rows
    pub query: String,
    /// Names of the units this assertion references
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Definition file this assertion was compiled from
    #[serde(default)]
    pub file_path: String,
}

impl Assertion {
    /// Create an assertion without an explicit target
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            query: query.into(),
            dependencies: Vec::new(),
            file_path: String::new(),
        }
    }

    /// The explicit target, or `(assertion_schema, name)`
    pub fn resolved_target(&self, project: &ProjectConfig) -> Target {
        self.target
            .clone()
            .unwrap_or_else(|| Target::new(project.assertion_schema.clone(), self.name.clone()))
    }
}

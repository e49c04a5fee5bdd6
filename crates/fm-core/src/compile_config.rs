//! Messages carried across the compile worker boundary.

use crate::config::ProjectConfigOverride;
use serde::{Deserialize, Serialize};

/// Options for compiling a project or an ad-hoc query against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompileConfig {
    /// Project root. Without it there is nothing to compile.
    #[serde(default)]
    pub project_dir: Option<String>,
    /// Ad-hoc query evaluated against the compiled project instead of returning the graph
    #[serde(default)]
    pub query: Option<String>,
    /// Schema suffix that replaces the project's when non-empty
    #[serde(default)]
    pub schema_suffix_override: Option<String>,
    /// Overrides merged onto the project config
    #[serde(default)]
    pub project_config_override: ProjectConfigOverride,
    /// Final program expression that replaces the generated one
    #[serde(default)]
    pub return_override: Option<String>,
}

impl CompileConfig {
    /// Compile config rooted at `project_dir`
    pub fn for_project(project_dir: impl Into<String>) -> Self {
        Self {
            project_dir: Some(project_dir.into()),
            ..Default::default()
        }
    }

    /// The project directory, treating an empty string as unset
    pub fn project_dir(&self) -> Option<&str> {
        self.project_dir.as_deref().filter(|dir| !dir.is_empty())
    }
}

/// Input of the bootstrap generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerateIndexConfig {
    /// Auxiliary template files, relative to the project root, in load order
    pub include_paths: Vec<String>,
    /// Definition files, relative to the project root, in load order
    pub definition_paths: Vec<String>,
    /// Compile options
    pub compile_config: CompileConfig,
}

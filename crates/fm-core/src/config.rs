//! Configuration types and parsing for forma.yml

use crate::error::{CoreError, CoreResult};
use crate::warehouse::WarehouseKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Project configuration file names, in lookup order
pub const PROJECT_CONFIG_FILES: [&str; 2] = ["forma.yml", "forma.yaml"];

/// Main project configuration from forma.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Warehouse the project publishes to
    #[serde(default)]
    pub warehouse: WarehouseKind,

    /// Schema for tables and views that don't set one
    #[serde(default = "default_schema")]
    pub default_schema: String,

    /// Schema for assertion views that don't set a target
    #[serde(default = "default_assertion_schema")]
    pub assertion_schema: String,

    /// Suffix appended to every schema (`<schema>_<suffix>`)
    #[serde(default)]
    pub schema_suffix: Option<String>,

    /// Variables available to `var()` in templates
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

/// Structured overrides merged on top of a loaded [`ProjectConfig`].
///
/// Each field that is set replaces the base value as a whole (shallow merge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfigOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub warehouse: Option<WarehouseKind>,
    #[serde(default)]
    pub default_schema: Option<String>,
    #[serde(default)]
    pub assertion_schema: Option<String>,
    #[serde(default)]
    pub schema_suffix: Option<String>,
    #[serde(default)]
    pub vars: Option<BTreeMap<String, String>>,
}

/// Execution-time flags for a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Rebuild incremental tables from scratch
    #[serde(default)]
    pub full_refresh: bool,
}

impl RunConfig {
    /// A run config forcing full rebuilds
    pub fn full_refresh() -> Self {
        Self { full_refresh: true }
    }
}

fn default_schema() -> String {
    "forma".to_string()
}

fn default_assertion_schema() -> String {
    "forma_assertions".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            warehouse: WarehouseKind::default(),
            default_schema: default_schema(),
            assertion_schema: default_assertion_schema(),
            schema_suffix: None,
            vars: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration YAML
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: ProjectConfig =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for forma.yml or forma.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let mut found = PROJECT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| path.exists());

        let Some(path) = found.next() else {
            return Err(CoreError::ConfigNotFound {
                path: dir.join(PROJECT_CONFIG_FILES[0]).display().to_string(),
            });
        };
        if let Some(ignored) = found.next() {
            log::warn!(
                "Both {} and {} exist; using {}",
                path.display(),
                ignored.display(),
                path.display()
            );
        }
        Self::load(&path)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.default_schema.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "default_schema cannot be empty".to_string(),
            });
        }
        if self.assertion_schema.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "assertion_schema cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Replace the schema suffix when `suffix` is non-empty
    pub fn override_schema_suffix(&mut self, suffix: &str) {
        if !suffix.is_empty() {
            self.schema_suffix = Some(suffix.to_string());
        }
    }

    /// Shallow-merge `overrides` onto this config
    pub fn merge(&mut self, overrides: ProjectConfigOverride) {
        let ProjectConfigOverride {
            name,
            warehouse,
            default_schema,
            assertion_schema,
            schema_suffix,
            vars,
        } = overrides;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(warehouse) = warehouse {
            self.warehouse = warehouse;
        }
        if let Some(schema) = default_schema {
            self.default_schema = schema;
        }
        if let Some(schema) = assertion_schema {
            self.assertion_schema = schema;
        }
        if let Some(suffix) = schema_suffix {
            self.schema_suffix = Some(suffix);
        }
        if let Some(vars) = vars {
            self.vars = vars;
        }
    }

    /// Apply the configured schema suffix to `schema`
    pub fn suffixed_schema(&self, schema: &str) -> String {
        match self.schema_suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => format!("{}_{}", schema, suffix),
            _ => schema.to_string(),
        }
    }

    /// Get a variable value by name
    pub fn get_var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl ProjectConfigOverride {
    /// Returns true when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

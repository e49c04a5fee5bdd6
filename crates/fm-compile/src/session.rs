//! The compilation session.
//!
//! A [`Session`] owns everything one compile needs: the merged project
//! config, the warehouse adapter used to render references, the template
//! environment, the declared units and the compile-error collector. It lives
//! for exactly one program run.

use crate::error::{CompileError, CompileResult};
use crate::program::json_string;
use fm_adapter::{adapter_for, Adapter};
use fm_core::{
    Assertion, CompilationError, CompiledGraph, ProjectConfig, Table, TableType, Target,
};
use fm_jinja::{DeclaredType, JinjaEnvironment, JinjaResult, RenderOptions, UnitConfig};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// File extensions accepted for definitions
pub const DEFINITION_EXTENSIONS: [&str; 2] = ["sql", "sqlx"];

/// A definition that passed the declaration pass
#[derive(Debug, Clone)]
struct DeclaredUnit {
    path: String,
    source: String,
    name: String,
    target: Target,
    config: UnitConfig,
}

enum CompiledUnit {
    Table(Table),
    Assertion(Assertion),
}

/// Explicit compilation context for one program run
pub struct Session {
    root: PathBuf,
    project: ProjectConfig,
    adapter: Box<dyn Adapter>,
    env: JinjaEnvironment<'static>,
    imports: String,
    units: Vec<DeclaredUnit>,
    errors: Vec<CompilationError>,
}

impl Session {
    /// Start a session for the project at `root`
    pub fn new(root: impl Into<PathBuf>, project: ProjectConfig) -> Self {
        let adapter = adapter_for(project.warehouse);
        let env = JinjaEnvironment::new(&project.vars);
        log::debug!(
            "Compile session for '{}' ({} warehouse)",
            project.name,
            project.warehouse
        );

        Self {
            root: root.into(),
            project,
            adapter,
            env,
            imports: String::new(),
            units: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    /// Failures collected so far, in the order they happened
    pub fn errors(&self) -> &[CompilationError] {
        &self.errors
    }

    /// Record a per-file failure and report it on the diagnostic stream
    pub fn record_error(&mut self, path: &str, error: impl Display) {
        log::warn!("Failed to compile {}: {}", path, error);
        self.errors.push(CompilationError::new(path, error.to_string()));
    }

    /// Load an include file and import it into every definition as `global`
    pub fn load_include(&mut self, path: &str, global: &str) -> CompileResult<()> {
        let source = self.read_source(path)?;
        self.env.add_template(path, &source)?;

        // An include that fails to evaluate is reported once, against its own
        // path, and never imported into the definitions.
        let import = format!("{{% import {} as {} %}}", json_string(path), global);
        self.env.render(&import, &RenderOptions::declaring())?;
        self.imports.push_str(&import);
        log::debug!("Loaded include {} as {}", path, global);
        Ok(())
    }

    /// Declare the unit defined in `path`.
    ///
    /// Renders the definition once with placeholder references to capture its
    /// `config()`, then registers its target so later definitions can `ref()` it.
    pub fn load_definition(&mut self, path: &str) -> CompileResult<()> {
        let is_definition = Path::new(path)
            .extension()
            .is_some_and(|ext| DEFINITION_EXTENSIONS.iter().any(|e| ext == *e));
        if !is_definition {
            return Err(CompileError::UnsupportedDefinition {
                path: path.to_string(),
            });
        }

        let source = self.read_source(path)?;
        let declared = self
            .env
            .render(&self.with_imports(&source), &RenderOptions::declaring())?;
        let config = UnitConfig::from_captured(&declared.config)?;

        let name = match &config.name {
            Some(name) => name.clone(),
            None => file_stem(path),
        };
        let schema = match (&config.schema, config.declared_type) {
            (Some(schema), _) => schema.clone(),
            (None, DeclaredType::Assertion) => self.project.assertion_schema.clone(),
            (None, _) => self.project.default_schema.clone(),
        };
        let target = Target::new(self.project.suffixed_schema(&schema), name.clone());

        if let Some(first) = self.units.iter().find(|u| u.name == name) {
            return Err(CompileError::DuplicateName {
                name,
                first_path: first.path.clone(),
            });
        }

        self.env
            .register_target(&name, &self.adapter.resolve_target(&target));
        log::debug!("Declared {} '{}' at {}", path, name, target);

        self.units.push(DeclaredUnit {
            path: path.to_string(),
            source,
            name,
            target,
            config,
        });
        Ok(())
    }

    /// Render every declared unit into a graph.
    ///
    /// Units that fail to render are left out and listed in `compile_errors`
    /// together with every earlier load failure.
    pub fn compile_graph(&mut self) -> CompiledGraph {
        let results: Vec<(String, CompileResult<CompiledUnit>)> = self
            .units
            .iter()
            .map(|unit| (unit.path.clone(), self.compile_unit(unit)))
            .collect();

        let mut graph = CompiledGraph {
            project_config: self.project.clone(),
            ..Default::default()
        };
        for (path, result) in results {
            match result {
                Ok(CompiledUnit::Table(table)) => graph.tables.push(table),
                Ok(CompiledUnit::Assertion(assertion)) => graph.assertions.push(assertion),
                Err(e) => self.record_error(&path, e),
            }
        }
        graph.compile_errors = self.errors.clone();

        log::info!(
            "Compiled {} tables and {} assertions ({} errors)",
            graph.tables.len(),
            graph.assertions.len(),
            graph.compile_errors.len()
        );
        graph
    }

    /// Render an ad-hoc query against the declared units.
    ///
    /// `self()` renders as an empty string.
    pub fn render_template(&self, query: &str) -> JinjaResult<String> {
        self.env
            .render(&self.with_imports(query), &RenderOptions::for_target("", false))
            .map(|rendered| rendered.sql)
    }

    fn compile_unit(&self, unit: &DeclaredUnit) -> CompileResult<CompiledUnit> {
        let template = self.with_imports(&unit.source);
        let self_target = self.adapter.resolve_target(&unit.target);
        let full = self
            .env
            .render(&template, &RenderOptions::for_target(self_target.clone(), false))?;

        let Some(table_type) = unit.config.declared_type.table_type() else {
            return Ok(CompiledUnit::Assertion(Assertion {
                name: unit.name.clone(),
                target: Some(unit.target.clone()),
                query: full.sql,
                dependencies: full.dependencies,
                file_path: unit.path.clone(),
            }));
        };

        let mut table = Table::new(unit.name.clone(), unit.target.clone(), table_type, full.sql);
        table.dependencies = full.dependencies;
        table.where_clause = unit.config.where_clause.clone();
        table.redshift = unit.config.redshift.clone();
        table.snowflake = unit.config.snowflake.clone();
        table.file_path = unit.path.clone();

        if table_type == TableType::Incremental {
            let incremental = self
                .env
                .render(&template, &RenderOptions::for_target(self_target, true))?;
            for dependency in incremental.dependencies {
                if !table.dependencies.contains(&dependency) {
                    table.dependencies.push(dependency);
                }
            }
            if incremental.sql != table.query {
                table.incremental_query = Some(incremental.sql);
            }
        }

        Ok(CompiledUnit::Table(table))
    }

    fn with_imports(&self, source: &str) -> String {
        format!("{}{}", self.imports, source)
    }

    fn read_source(&self, path: &str) -> CompileResult<String> {
        std::fs::read_to_string(self.root.join(path)).map_err(|e| CompileError::SourceRead {
            path: path.to_string(),
            source: e,
        })
    }
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

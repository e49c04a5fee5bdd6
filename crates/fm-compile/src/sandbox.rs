//! Runs a bootstrap [`Program`] against a project root.
//!
//! The sandbox only knows the `core` module. Every file a program names must
//! be a relative path inside the root. Includes and definitions are loaded
//! one at a time; a failing file is recorded on the session and the run
//! continues with the next one.

use crate::error::{CompileError, CompileResult};
use crate::program::{Directive, Program, ReturnExpr, CORE_MODULE};
use crate::session::Session;
use fm_core::config::PROJECT_CONFIG_FILES;
use fm_core::ProjectConfig;
use std::path::{Component, Path, PathBuf};

/// A file load waiting for the session
enum PendingLoad {
    Include { path: String, global: String },
    Define { path: String },
}

/// Executes bootstrap programs rooted at one project directory
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root` (an absolute, canonical directory)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `program` and return its result text.
    ///
    /// Structural problems (syntax, forbidden modules, escaping paths, an
    /// unreadable project config) fail the run. Per-file failures do not.
    pub fn run(&self, program: &Program) -> CompileResult<String> {
        let mut core_loaded = false;
        let mut project: Option<ProjectConfig> = None;
        let mut pending: Vec<PendingLoad> = Vec::new();
        let mut session: Option<Session> = None;

        for directive in program.directives() {
            if let Directive::Use { module } = directive {
                if module != CORE_MODULE {
                    return Err(CompileError::ForbiddenModule {
                        module: module.clone(),
                    });
                }
                core_loaded = true;
                continue;
            }
            if !core_loaded {
                return Err(CompileError::CoreNotLoaded {
                    directive: directive.keyword().to_string(),
                });
            }

            match directive {
                Directive::Use { .. } => {}
                Directive::Include { path, global } => {
                    self.check_path(path)?;
                    let load = PendingLoad::Include {
                        path: path.clone(),
                        global: global.clone(),
                    };
                    match session.as_mut() {
                        Some(session) => apply(session, load),
                        None => pending.push(load),
                    }
                }
                Directive::Define { path } => {
                    self.check_path(path)?;
                    let load = PendingLoad::Define { path: path.clone() };
                    match session.as_mut() {
                        Some(session) => apply(session, load),
                        None => pending.push(load),
                    }
                }
                Directive::Project { path } => {
                    project = Some(self.load_project(path)?);
                }
                Directive::SchemaSuffix { suffix } => {
                    project_mut(&mut project, directive)?.override_schema_suffix(suffix);
                }
                Directive::Merge { overrides } => {
                    project_mut(&mut project, directive)?.merge(overrides.clone());
                }
                Directive::SessionInit { project_dir } => {
                    if Path::new(project_dir) != self.root {
                        return Err(CompileError::PathEscapesRoot {
                            path: project_dir.clone(),
                        });
                    }
                    let config = project.take().ok_or_else(|| CompileError::OutOfOrder {
                        directive: directive.keyword().to_string(),
                        requirement: "a loaded project config",
                    })?;
                    let mut new_session = Session::new(self.root.clone(), config);
                    for load in pending.drain(..) {
                        apply(&mut new_session, load);
                    }
                    session = Some(new_session);
                }
                Directive::Return(expr) => {
                    let session = session.as_mut().ok_or_else(|| CompileError::OutOfOrder {
                        directive: directive.keyword().to_string(),
                        requirement: "an initialized session",
                    })?;
                    return evaluate_return(session, expr);
                }
            }
        }

        Err(CompileError::MissingReturn)
    }

    /// Reject absolute paths and paths that leave the root
    fn check_path(&self, path: &str) -> CompileResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = path.is_empty()
            || relative.components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
        if escapes {
            return Err(CompileError::PathEscapesRoot {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn load_project(&self, path: &str) -> CompileResult<ProjectConfig> {
        let full_path = self.check_path(path)?;
        // forma.yml and forma.yaml are interchangeable
        if PROJECT_CONFIG_FILES.contains(&path) && !full_path.exists() {
            return Ok(ProjectConfig::load_from_dir(&self.root)?);
        }
        Ok(ProjectConfig::load(&full_path)?)
    }
}

fn project_mut<'a>(
    project: &'a mut Option<ProjectConfig>,
    directive: &Directive,
) -> CompileResult<&'a mut ProjectConfig> {
    project.as_mut().ok_or_else(|| CompileError::OutOfOrder {
        directive: directive.keyword().to_string(),
        requirement: "a preceding 'project' directive",
    })
}

/// Load one file inside its own failure boundary
fn apply(session: &mut Session, load: PendingLoad) {
    let (path, result) = match load {
        PendingLoad::Include { path, global } => {
            let result = session.load_include(&path, &global);
            (path, result)
        }
        PendingLoad::Define { path } => {
            let result = session.load_definition(&path);
            (path, result)
        }
    };
    if let Err(e) = result {
        session.record_error(&path, e);
    }
}

/// Evaluate the final expression.
///
/// A failing ad-hoc template yields its error text as the result; callers of
/// the worker treat the output as either SQL or an error message.
fn evaluate_return(session: &mut Session, expr: &ReturnExpr) -> CompileResult<String> {
    match expr {
        ReturnExpr::Graph => Ok(session.compile_graph().to_base64()?),
        ReturnExpr::Template(query) => match session.render_template(query) {
            Ok(sql) => Ok(sql),
            Err(e) => {
                log::warn!("Ad-hoc query failed to compile: {}", e);
                Ok(e.to_string())
            }
        },
    }
}

#[cfg(test)]
#[path = "sandbox_test.rs"]
mod tests;

//! Compile orchestrator: decides whether a query needs compiling and runs the
//! isolated compile worker when it does.

use crate::error::{CompileError, CompileResult};
use crate::program::json_string;
use fm_core::codec::encode_base64;
use fm_core::{CompileConfig, CompiledGraph};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Environment variable naming the compile worker executable
pub const WORKER_ENV_VAR: &str = "FORMA_COMPILE_WORKER";

/// File name of the compile worker executable
pub const WORKER_BIN: &str = "fm-compile-worker";

/// Compile `query` against the project in `config`.
///
/// Without a config or a project directory the query is returned unchanged and
/// no worker is started. Otherwise the result is whatever the worker printed:
/// compiled SQL, or the text of the template error.
pub async fn compile(query: &str, config: Option<&CompileConfig>) -> CompileResult<String> {
    if project_dir(config).is_none() {
        return Ok(query.to_string());
    }
    CompileOrchestrator::locate()?.compile(query, config).await
}

fn project_dir(config: Option<&CompileConfig>) -> Option<&str> {
    config.and_then(CompileConfig::project_dir)
}

/// Runs the compile worker subprocess
#[derive(Debug, Clone)]
pub struct CompileOrchestrator {
    worker: PathBuf,
}

impl CompileOrchestrator {
    /// Use the worker executable at `worker`
    pub fn new(worker: impl Into<PathBuf>) -> Self {
        Self {
            worker: worker.into(),
        }
    }

    /// Find the worker through `FORMA_COMPILE_WORKER`, or next to the current
    /// executable
    pub fn locate() -> CompileResult<Self> {
        let worker = match std::env::var_os(WORKER_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => sibling_worker_path()?,
        };
        if !worker.is_file() {
            return Err(CompileError::WorkerNotFound {
                path: worker.display().to_string(),
            });
        }
        Ok(Self::new(worker))
    }

    pub fn worker(&self) -> &Path {
        &self.worker
    }

    /// Compile an ad-hoc query; see [`compile`]
    pub async fn compile(
        &self,
        query: &str,
        config: Option<&CompileConfig>,
    ) -> CompileResult<String> {
        let Some(config) = config.filter(|c| c.project_dir().is_some()) else {
            return Ok(query.to_string());
        };

        let mut request = self.request(config)?;
        request.query = Some(query.to_string());
        request.return_override = Some(template_expression(query));
        self.run_worker(&request).await
    }

    /// Compile the whole project into a graph
    pub async fn compile_graph(&self, config: &CompileConfig) -> CompileResult<CompiledGraph> {
        if config.project_dir().is_none() {
            return Err(CompileError::MissingProjectDir);
        }
        let mut request = self.request(config)?;
        request.query = None;
        request.return_override = None;

        let output = self.run_worker(&request).await?;
        CompiledGraph::from_base64(&output).map_err(|e| CompileError::WorkerOutput {
            message: e.to_string(),
        })
    }

    /// Copy of `config` with an absolute project directory
    fn request(&self, config: &CompileConfig) -> CompileResult<CompileConfig> {
        let dir = config.project_dir().ok_or(CompileError::MissingProjectDir)?;
        let absolute = Path::new(dir)
            .canonicalize()
            .map_err(|e| CompileError::ProjectDir {
                path: dir.to_string(),
                source: e,
            })?;

        let mut request = config.clone();
        request.project_dir = Some(absolute.display().to_string());
        Ok(request)
    }

    async fn run_worker(&self, request: &CompileConfig) -> CompileResult<String> {
        let encoded = encode_base64(request, "CompileConfig")?;
        log::debug!(
            "Starting compile worker {} for {}",
            self.worker.display(),
            request.project_dir().unwrap_or_default()
        );

        let mut child = Command::new(&self.worker)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CompileError::WorkerIo)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(encoded.as_bytes())
                .await
                .map_err(CompileError::WorkerIo)?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(CompileError::WorkerIo)?;

        if !output.status.success() {
            return Err(CompileError::WorkerFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| CompileError::WorkerOutput {
            message: e.to_string(),
        })
    }
}

/// The `return` expression that renders `query` as a template
pub fn template_expression(query: &str) -> String {
    format!("template {}", json_string(query))
}

/// `fm-compile-worker` in the directory of the running executable, or in its
/// parent when running from a `deps/` directory (test binaries)
fn sibling_worker_path() -> CompileResult<PathBuf> {
    let exe = std::env::current_exe().map_err(CompileError::WorkerIo)?;
    let file_name = format!("{}{}", WORKER_BIN, std::env::consts::EXE_SUFFIX);

    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    let candidate = dir.join(&file_name);
    if candidate.is_file() || !dir.ends_with("deps") {
        return Ok(candidate);
    }
    Ok(dir.parent().unwrap_or(dir).join(file_name))
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

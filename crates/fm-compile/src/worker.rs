//! The compile worker: everything that runs inside the isolated
//! `fm-compile-worker` process.

use crate::bootstrap::generate_index;
use crate::error::{CompileError, CompileResult};
use crate::program::Program;
use crate::sandbox::Sandbox;
use fm_core::codec::{decode_base64, encode_base64};
use fm_core::{CompileConfig, GenerateIndexConfig};
use std::path::Path;

/// Include file pattern, relative to the project root
pub const INCLUDE_PATTERNS: [&str; 1] = ["includes/**/*.sql"];

/// Definition file patterns, relative to the project root
pub const DEFINITION_PATTERNS: [&str; 2] = ["definitions/**/*.sql", "definitions/**/*.sqlx"];

/// Compile the project described by a base64 [`CompileConfig`] and return
/// the program result: graph base64, compiled SQL, or ad-hoc error text.
pub fn run_worker(encoded_config: &str) -> CompileResult<String> {
    let mut compile_config: CompileConfig = decode_base64(encoded_config, "CompileConfig")?;
    let project_dir = compile_config
        .project_dir()
        .ok_or(CompileError::MissingProjectDir)?;
    let root = Path::new(project_dir)
        .canonicalize()
        .map_err(|e| CompileError::ProjectDir {
            path: project_dir.to_string(),
            source: e,
        })?;
    compile_config.project_dir = Some(root.display().to_string());

    let index_config = GenerateIndexConfig {
        include_paths: discover(&root, &INCLUDE_PATTERNS)?,
        definition_paths: discover(&root, &DEFINITION_PATTERNS)?,
        compile_config,
    };
    log::debug!(
        "Compiling {} with {} includes and {} definitions",
        root.display(),
        index_config.include_paths.len(),
        index_config.definition_paths.len()
    );

    let source = generate_index(&encode_base64(&index_config, "GenerateIndexConfig")?)?;
    let mut program = Program::parse(&source)?;
    if let Some(expr) = index_config.compile_config.return_override.as_deref() {
        program.override_return(expr)?;
    }

    Sandbox::new(root).run(&program)
}

/// Find files matching `patterns` under `root`, as sorted `/`-separated paths
/// relative to `root`
pub fn discover(root: &Path, patterns: &[&str]) -> CompileResult<Vec<String>> {
    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let mut paths = Vec::new();

    for pattern in patterns {
        let full_pattern = format!("{}/{}", escaped_root, pattern);
        let entries = glob::glob(&full_pattern).map_err(|e| CompileError::Discovery {
            message: format!("invalid pattern '{}': {}", pattern, e),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| CompileError::Discovery {
                message: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(root) {
                let relative: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                paths.push(relative.join("/"));
            }
        }
    }

    paths.sort();
    paths.dedup();
    Ok(paths)
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;

//! Bootstrap generator: turns a [`GenerateIndexConfig`] into the text of the
//! program the sandbox runs.

use crate::error::CompileResult;
use crate::program::{Directive, Program, ReturnExpr, CORE_MODULE};
use fm_core::codec::decode_base64;
use fm_core::config::PROJECT_CONFIG_FILES;
use fm_core::GenerateIndexConfig;
use std::path::Path;

/// Decode a base64 [`GenerateIndexConfig`] and generate the bootstrap program
/// source for it
pub fn generate_index(base64_config: &str) -> CompileResult<String> {
    let config: GenerateIndexConfig = decode_base64(base64_config, "GenerateIndexConfig")?;
    Ok(build_program(&config).to_string())
}

/// Build the bootstrap program for `config`
pub fn build_program(config: &GenerateIndexConfig) -> Program {
    let compile_config = &config.compile_config;
    let mut program = Program::new();

    program.push(Directive::Use {
        module: CORE_MODULE.to_string(),
    });

    for path in &config.include_paths {
        program.push(Directive::Include {
            path: path.clone(),
            global: include_global_name(path),
        });
    }

    program.push(Directive::Project {
        path: PROJECT_CONFIG_FILES[0].to_string(),
    });
    if let Some(suffix) = compile_config
        .schema_suffix_override
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        program.push(Directive::SchemaSuffix {
            suffix: suffix.to_string(),
        });
    }
    if !compile_config.project_config_override.is_empty() {
        program.push(Directive::Merge {
            overrides: compile_config.project_config_override.clone(),
        });
    }

    program.push(Directive::SessionInit {
        project_dir: compile_config.project_dir().unwrap_or_default().to_string(),
    });

    for path in &config.definition_paths {
        program.push(Directive::Define { path: path.clone() });
    }

    let expr = match compile_config.query.as_deref() {
        Some(query) => ReturnExpr::Template(query.to_string()),
        None => ReturnExpr::Graph,
    };
    program.push(Directive::Return(expr));

    program
}

/// Names an include may not shadow: the context functions and the template
/// keywords an import target cannot take.
const RESERVED_GLOBALS: &[&str] = &[
    "ref",
    "resolve",
    "self",
    "config",
    "var",
    "is_incremental",
    "true",
    "false",
    "none",
    "loop",
];

/// Global name an include is imported under: the file stem with every
/// non-identifier character replaced by `_`, suffixed with `_` when it
/// would shadow a reserved name
pub fn include_global_name(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    if RESERVED_GLOBALS.contains(&name.to_ascii_lowercase().as_str()) {
        name.push('_');
    }
    name
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;

//! The bootstrap program: a line-oriented script that drives one compile
//! session.
//!
//! Every line is one [`Directive`]. String operands are JSON string literals,
//! so any path or query fits on a single line. Blank lines and lines starting
//! with `#` are ignored.
//!
//! ```text
//! # forma bootstrap program
//! use core
//! include "includes/helpers.sql" as helpers
//! project "forma.yml"
//! project.schema_suffix "dev"
//! project.merge {"default_schema":"analytics"}
//! session.init "/abs/project"
//! define "definitions/orders.sql"
//! return graph
//! ```

use crate::error::{CompileError, CompileResult};
use fm_core::ProjectConfigOverride;
use std::fmt;

/// First line of every generated program
pub const PROGRAM_HEADER: &str = "# forma bootstrap program";

/// The only module a program may `use`
pub const CORE_MODULE: &str = "core";

/// What a program returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnExpr {
    /// Base64 of the compiled graph
    Graph,
    /// An ad-hoc query rendered against the session
    Template(String),
}

/// One program line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `use <module>`
    Use { module: String },
    /// `include "<path>" as <global>`
    Include { path: String, global: String },
    /// `project "<path>"`
    Project { path: String },
    /// `project.schema_suffix "<suffix>"`
    SchemaSuffix { suffix: String },
    /// `project.merge {<json>}`
    Merge { overrides: ProjectConfigOverride },
    /// `session.init "<project_dir>"`
    SessionInit { project_dir: String },
    /// `define "<path>"`
    Define { path: String },
    /// `return graph` / `return template "<query>"`
    Return(ReturnExpr),
}

impl Directive {
    /// Leading keyword, for error messages
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Use { .. } => "use",
            Directive::Include { .. } => "include",
            Directive::Project { .. } => "project",
            Directive::SchemaSuffix { .. } => "project.schema_suffix",
            Directive::Merge { .. } => "project.merge",
            Directive::SessionInit { .. } => "session.init",
            Directive::Define { .. } => "define",
            Directive::Return(_) => "return",
        }
    }

    /// Parse a single line. `line` is the 1-based line number used in errors.
    pub fn parse_line(text: &str, line: usize) -> CompileResult<Self> {
        let syntax = |message: String| CompileError::ProgramSyntax { line, message };

        let text = text.trim();
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (text, ""),
        };

        let directive = match keyword {
            "use" => {
                if !is_identifier(rest) {
                    return Err(syntax(format!("invalid module name '{}'", rest)));
                }
                Directive::Use {
                    module: rest.to_string(),
                }
            }
            "include" => {
                let (path, rest) = string_operand(rest).map_err(syntax)?;
                let global = rest
                    .strip_prefix("as")
                    .filter(|g| g.starts_with(char::is_whitespace))
                    .map(str::trim)
                    .filter(|g| is_identifier(g))
                    .ok_or_else(|| syntax("expected 'as <identifier>' after include path".into()))?;
                Directive::Include {
                    path,
                    global: global.to_string(),
                }
            }
            "project" => Directive::Project {
                path: single_string(rest).map_err(syntax)?,
            },
            "project.schema_suffix" => Directive::SchemaSuffix {
                suffix: single_string(rest).map_err(syntax)?,
            },
            "project.merge" => Directive::Merge {
                overrides: serde_json::from_str(rest)
                    .map_err(|e| syntax(format!("invalid project override: {}", e)))?,
            },
            "session.init" => Directive::SessionInit {
                project_dir: single_string(rest).map_err(syntax)?,
            },
            "define" => Directive::Define {
                path: single_string(rest).map_err(syntax)?,
            },
            "return" => match rest {
                "graph" => Directive::Return(ReturnExpr::Graph),
                _ => {
                    let query = rest
                        .strip_prefix("template")
                        .filter(|q| q.starts_with(char::is_whitespace))
                        .ok_or_else(|| syntax("expected 'graph' or 'template'".into()))
                        .and_then(|q| single_string(q).map_err(syntax))?;
                    Directive::Return(ReturnExpr::Template(query))
                }
            },
            other => return Err(syntax(format!("unknown directive '{}'", other))),
        };

        Ok(directive)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Use { module } => write!(f, "use {}", module),
            Directive::Include { path, global } => {
                write!(f, "include {} as {}", json_string(path), global)
            }
            Directive::Project { path } => write!(f, "project {}", json_string(path)),
            Directive::SchemaSuffix { suffix } => {
                write!(f, "project.schema_suffix {}", json_string(suffix))
            }
            Directive::Merge { overrides } => {
                let json = serde_json::to_string(overrides).map_err(|_| fmt::Error)?;
                write!(f, "project.merge {}", json)
            }
            Directive::SessionInit { project_dir } => {
                write!(f, "session.init {}", json_string(project_dir))
            }
            Directive::Define { path } => write!(f, "define {}", json_string(path)),
            Directive::Return(ReturnExpr::Graph) => write!(f, "return graph"),
            Directive::Return(ReturnExpr::Template(query)) => {
                write!(f, "return template {}", json_string(query))
            }
        }
    }
}

/// A parsed bootstrap program
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    directives: Vec<Directive>,
}

impl Program {
    /// An empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse program text
    pub fn parse(text: &str) -> CompileResult<Self> {
        let directives = text
            .lines()
            .enumerate()
            .filter(|(_, line)| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
            .map(|(index, line)| Directive::parse_line(line, index + 1))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(Self { directives })
    }

    /// Append a directive
    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Replace the final `return` with `return <expr>`, appending one if the
    /// program has none
    pub fn override_return(&mut self, expr: &str) -> CompileResult<()> {
        let directive = Directive::parse_line(&format!("return {}", expr.trim()), 0)?;
        match self
            .directives
            .iter()
            .rposition(|d| matches!(d, Directive::Return(_)))
        {
            Some(index) => self.directives[index] = directive,
            None => self.directives.push(directive),
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", PROGRAM_HEADER)?;
        for directive in &self.directives {
            writeln!(f, "{}", directive)?;
        }
        Ok(())
    }
}

/// Render `s` as a JSON string literal
pub(crate) fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Split a leading JSON string literal from `text`
fn string_operand(text: &str) -> Result<(String, &str), String> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<String>();
    match stream.next() {
        Some(Ok(value)) => {
            let rest = &text[stream.byte_offset()..];
            Ok((value, rest.trim()))
        }
        Some(Err(e)) => Err(format!("expected a JSON string: {}", e)),
        None => Err("expected a JSON string operand".to_string()),
    }
}

/// Parse `text` as exactly one JSON string literal
fn single_string(text: &str) -> Result<String, String> {
    let (value, rest) = string_operand(text)?;
    if !rest.is_empty() {
        return Err(format!("unexpected trailing input '{}'", rest));
    }
    Ok(value)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "program_test.rs"]
mod tests;

//! Jinja environment setup for Forma

use crate::error::{JinjaError, JinjaResult};
use crate::functions::{
    lock, make_config_fn, make_is_incremental_fn, make_ref_fn, make_self_fn, make_var_fn,
    ConfigCapture, RenderScope, ScopeCapture,
};
use minijinja::{Environment, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// Per-render inputs
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Value returned by `self()`
    pub self_target: String,
    /// Value returned by `is_incremental()`
    pub incremental: bool,
    /// Render references to undeclared units as their bare name instead of failing
    pub declaring: bool,
}

impl RenderOptions {
    /// Options for the declaration pass, before any target is known
    pub fn declaring() -> Self {
        Self {
            declaring: true,
            ..Default::default()
        }
    }

    /// Options for rendering the unit living at `self_target`
    pub fn for_target(self_target: impl Into<String>, incremental: bool) -> Self {
        Self {
            self_target: self_target.into(),
            incremental,
            declaring: false,
        }
    }
}

/// Output of a render
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Rendered SQL, trimmed
    pub sql: String,
    /// Keyword arguments of every `config()` call
    pub config: HashMap<String, Value>,
    /// Units referenced through `ref()`/`resolve()`, in first-reference order
    pub dependencies: Vec<String>,
}

/// Jinja templating environment for Forma
pub struct JinjaEnvironment<'a> {
    env: Environment<'a>,
    config_capture: ConfigCapture,
    scope: ScopeCapture,
}

impl<'a> JinjaEnvironment<'a> {
    /// Create a new Jinja environment with project variables
    pub fn new(vars: &BTreeMap<String, String>) -> Self {
        let mut env = Environment::new();
        let config_capture: ConfigCapture = Arc::new(Mutex::new(HashMap::new()));
        let scope: ScopeCapture = Arc::new(Mutex::new(RenderScope::default()));

        env.add_function("config", make_config_fn(config_capture.clone()));
        env.add_function("var", make_var_fn(vars.clone()));

        let ref_fn = make_ref_fn(scope.clone());
        env.add_function("ref", ref_fn.clone());
        env.add_function("resolve", ref_fn);
        env.add_function("self", make_self_fn(scope.clone()));
        env.add_function("is_incremental", make_is_incremental_fn(scope.clone()));

        Self {
            env,
            config_capture,
            scope,
        }
    }

    /// Register a named template that definitions can `{% import %}`
    pub fn add_template(&mut self, name: &str, source: &str) -> JinjaResult<()> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(JinjaError::from)
    }

    /// Make `name` resolvable through `ref()`, rendering as `rendered_target`
    pub fn register_target(&self, name: &str, rendered_target: &str) {
        lock(&self.scope)
            .targets
            .insert(name.to_string(), rendered_target.to_string());
    }

    /// Returns true when `name` has been registered
    pub fn has_target(&self, name: &str) -> bool {
        lock(&self.scope).targets.contains_key(name)
    }

    /// Render a template string
    pub fn render(&self, template: &str, options: &RenderOptions) -> JinjaResult<Rendered> {
        lock(&self.config_capture).clear();
        lock(&self.scope).begin(
            options.self_target.clone(),
            options.incremental,
            options.declaring,
        );

        let result = self.env.render_str(template, ());

        let config = lock(&self.config_capture).clone();
        let mut scope = lock(&self.scope);
        let sql = match result {
            Ok(sql) => sql,
            Err(err) => {
                return Err(match scope.unresolved.take() {
                    Some(name) => JinjaError::UnknownReference { name },
                    None => JinjaError::from(err),
                });
            }
        };

        Ok(Rendered {
            sql: sql.trim().to_string(),
            config,
            dependencies: std::mem::take(&mut scope.dependencies),
        })
    }
}

impl Default for JinjaEnvironment<'_> {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;

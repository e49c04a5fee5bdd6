//! Jinja template functions: config(), ref()/resolve(), self(), var() and
//! is_incremental().
//!
//! Every function shares state with [`JinjaEnvironment`](crate::JinjaEnvironment)
//! through `Arc<Mutex<_>>` captures, since minijinja functions are `'static`
//! closures.

use minijinja::value::{Kwargs, Value};
use minijinja::Error;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Captured config values from config() calls
pub(crate) type ConfigCapture = Arc<Mutex<HashMap<String, Value>>>;

/// Render-scoped state shared by ref(), self() and is_incremental()
pub(crate) type ScopeCapture = Arc<Mutex<RenderScope>>;

/// State read and written by the reference functions during one render
#[derive(Debug, Default)]
pub(crate) struct RenderScope {
    /// Unit name to its rendered, dialect-quoted target
    pub targets: BTreeMap<String, String>,
    /// While declaring, references render as placeholders and never fail
    pub declaring: bool,
    /// Value returned by self()
    pub self_target: String,
    /// Value returned by is_incremental()
    pub incremental: bool,
    /// Units referenced so far, in first-reference order
    pub dependencies: Vec<String>,
    /// First reference that could not be resolved
    pub unresolved: Option<String>,
}

impl RenderScope {
    /// Reset everything except the registered targets
    pub fn begin(&mut self, self_target: String, incremental: bool, declaring: bool) {
        self.self_target = self_target;
        self.incremental = incremental;
        self.declaring = declaring;
        self.dependencies.clear();
        self.unresolved = None;
    }
}

/// Lock shared function state, recovering from poisoning
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Create the config() function that captures unit configuration
///
/// Usage in templates:
/// ```jinja
/// {{ config(type='table', schema='staging') }}
/// ```
pub(crate) fn make_config_fn(
    capture: ConfigCapture,
) -> impl Fn(Kwargs) -> Result<String, Error> + Send + Sync + Clone + 'static {
    move |kwargs: Kwargs| {
        let mut captured = lock(&capture);

        for key in kwargs.args() {
            let value = kwargs.get::<Value>(key).map_err(|e| {
                Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("failed to get config kwarg '{}': {}", key, e),
                )
            })?;
            if captured.insert(key.to_string(), value).is_some() {
                log::warn!("config key '{}' set more than once; keeping the last value", key);
            }
        }

        Ok(String::new())
    }
}

/// Create the ref()/resolve() function that renders another unit's target
/// and records the dependency
///
/// Usage in templates:
/// ```jinja
/// SELECT * FROM {{ ref('stg_orders') }}
/// ```
pub(crate) fn make_ref_fn(
    scope: ScopeCapture,
) -> impl Fn(&str) -> Result<String, Error> + Send + Sync + Clone + 'static {
    move |name: &str| {
        let mut scope = lock(&scope);

        if !scope.dependencies.iter().any(|d| d == name) {
            scope.dependencies.push(name.to_string());
        }

        if let Some(target) = scope.targets.get(name) {
            return Ok(target.clone());
        }
        if scope.declaring {
            return Ok(name.to_string());
        }

        if scope.unresolved.is_none() {
            scope.unresolved = Some(name.to_string());
        }
        Err(Error::new(
            minijinja::ErrorKind::InvalidOperation,
            format!("unknown reference '{}'", name),
        ))
    }
}

/// Create the self() function that returns the current unit's target
pub(crate) fn make_self_fn(
    scope: ScopeCapture,
) -> impl Fn() -> String + Send + Sync + Clone + 'static {
    move || lock(&scope).self_target.clone()
}

/// Create the is_incremental() function
///
/// Usage in templates:
/// ```jinja
/// {% if is_incremental() %}
///   WHERE updated_at > (SELECT MAX(updated_at) FROM {{ self() }})
/// {% endif %}
/// ```
pub(crate) fn make_is_incremental_fn(
    scope: ScopeCapture,
) -> impl Fn() -> bool + Send + Sync + Clone + 'static {
    move || lock(&scope).incremental
}

/// Create the var() function that retrieves project variables
///
/// Usage in templates:
/// ```jinja
/// {{ var('start_date') }}
/// {{ var('missing', 'default_value') }}
/// ```
pub(crate) fn make_var_fn(
    vars: BTreeMap<String, String>,
) -> impl Fn(&str, Option<Value>) -> Result<Value, Error> + Send + Sync + Clone + 'static {
    move |name: &str, default: Option<Value>| {
        if let Some(value) = vars.get(name) {
            Ok(Value::from(value.as_str()))
        } else if let Some(default_val) = default {
            Ok(default_val)
        } else {
            Err(Error::new(
                minijinja::ErrorKind::UndefinedError,
                format!("Variable '{}' is not defined and no default provided", name),
            ))
        }
    }
}

#[cfg(test)]
#[path = "functions_test.rs"]
mod tests;

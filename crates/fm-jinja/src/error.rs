//! Error types for fm-jinja

use thiserror::Error;

/// Jinja templating errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Template render error (J001)
    #[error("[J001] Jinja render error: {0}")]
    RenderError(String),

    /// Reference to a unit that was never declared (J002)
    #[error("[J002] Unknown reference '{name}'. No table, view or assertion with that name is defined")]
    UnknownReference { name: String },

    /// Invalid config key (J003)
    #[error("[J003] Invalid config key '{key}'. Valid keys: type, schema, name, where, redshift, snowflake")]
    InvalidConfigKey { key: String },

    /// Config key with a value of the wrong shape (J004)
    #[error("[J004] Invalid value for config key '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        JinjaError::RenderError(err.to_string())
    }
}

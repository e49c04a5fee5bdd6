//! Typed view of the keyword arguments captured from `config()`.

use crate::error::{JinjaError, JinjaResult};
use fm_core::{RedshiftOptions, SnowflakeOptions, TableType};
use minijinja::Value;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// What a definition file declares itself to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclaredType {
    Table,
    #[default]
    View,
    Incremental,
    Assertion,
}

impl DeclaredType {
    /// Parse the `type` config value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "table" => Some(Self::Table),
            "view" => Some(Self::View),
            "incremental" => Some(Self::Incremental),
            "assertion" => Some(Self::Assertion),
            _ => None,
        }
    }

    /// The table type, or `None` for assertions
    pub fn table_type(&self) -> Option<TableType> {
        match self {
            Self::Table => Some(TableType::Table),
            Self::View => Some(TableType::View),
            Self::Incremental => Some(TableType::Incremental),
            Self::Assertion => None,
        }
    }
}

/// Unit configuration declared by a definition's `config()` call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitConfig {
    pub declared_type: DeclaredType,
    pub schema: Option<String>,
    pub name: Option<String>,
    pub where_clause: Option<String>,
    pub redshift: Option<RedshiftOptions>,
    pub snowflake: Option<SnowflakeOptions>,
}

impl UnitConfig {
    /// Build from captured `config()` keyword arguments
    pub fn from_captured(captured: &HashMap<String, Value>) -> JinjaResult<Self> {
        let mut config = UnitConfig::default();

        for (key, value) in captured {
            match key.as_str() {
                "type" => {
                    let declared = string_value(key, value)?;
                    config.declared_type = DeclaredType::parse(&declared).ok_or_else(|| {
                        JinjaError::InvalidConfigValue {
                            key: key.clone(),
                            message: format!(
                                "unknown type '{}', expected table, view, incremental or assertion",
                                declared
                            ),
                        }
                    })?;
                }
                "schema" => config.schema = Some(string_value(key, value)?),
                "name" => config.name = Some(string_value(key, value)?),
                "where" => config.where_clause = Some(string_value(key, value)?),
                "redshift" => config.redshift = Some(object_value(key, value)?),
                "snowflake" => config.snowflake = Some(object_value(key, value)?),
                _ => return Err(JinjaError::InvalidConfigKey { key: key.clone() }),
            }
        }

        Ok(config)
    }
}

fn string_value(key: &str, value: &Value) -> JinjaResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| JinjaError::InvalidConfigValue {
            key: key.to_string(),
            message: format!("expected a string, got {}", value.kind()),
        })
}

fn object_value<T: serde::de::DeserializeOwned>(key: &str, value: &Value) -> JinjaResult<T> {
    let json = serde_json::to_value(value).map_err(|e| JinjaError::InvalidConfigValue {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(json, JsonValue::Object(_)) {
        return Err(JinjaError::InvalidConfigValue {
            key: key.to_string(),
            message: format!("expected a mapping, got {}", value.kind()),
        });
    }
    serde_json::from_value(json).map_err(|e| JinjaError::InvalidConfigValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

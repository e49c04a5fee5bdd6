//! Compiled transformation units and the kinds of warehouse objects they produce.

use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a table definition is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    /// Rebuilt from scratch on every run
    Table,
    /// A view over the query (default)
    #[default]
    View,
    /// A table that only receives new rows once it exists
    Incremental,
}

impl TableType {
    /// The kind of warehouse object this type materializes as.
    ///
    /// Incremental tables are plain tables in the warehouse.
    pub fn base_kind(&self) -> ObjectKind {
        match self {
            TableType::View => ObjectKind::View,
            TableType::Table | TableType::Incremental => ObjectKind::Table,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableType::Table => write!(f, "table"),
            TableType::View => write!(f, "view"),
            TableType::Incremental => write!(f, "incremental"),
        }
    }
}

/// Kind of an object that exists (or will exist) in the warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A base table
    Table,
    /// A view
    View,
}

impl ObjectKind {
    /// The other object kind
    pub fn opposite(&self) -> ObjectKind {
        match self {
            ObjectKind::Table => ObjectKind::View,
            ObjectKind::View => ObjectKind::Table,
        }
    }

    /// SQL keyword for this kind (`table` / `view`)
    pub fn as_sql(&self) -> &'static str {
        match self {
            ObjectKind::Table => "table",
            ObjectKind::View => "view",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Redshift placement hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RedshiftOptions {
    /// Distribution style (`even`, `key`, `all`, `auto`)
    #[serde(default)]
    pub dist_style: Option<String>,
    /// Distribution key column
    #[serde(default)]
    pub dist_key: Option<String>,
    /// Sort style (`compound` or `interleaved`)
    #[serde(default)]
    pub sort_style: Option<String>,
    /// Sort key columns, in order
    #[serde(default)]
    pub sort_keys: Vec<String>,
}

/// Snowflake clustering hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SnowflakeOptions {
    /// Clustering key expressions, in order
    #[serde(default)]
    pub cluster_by: Vec<String>,
}

/// A compiled transformation unit.
///
/// Produced by compilation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Logical name (the definition's name)
    pub name: String,
    /// Where the table lives in the warehouse
    pub target: Target,
    /// Materialization
    pub table_type: TableType,
    /// Full query producing every row
    pub query: String,
    /// Query producing only new rows, used once an incremental table exists
    #[serde(default)]
    pub incremental_query: Option<String>,
    /// Filter applied to the incremental source rows
    #[serde(default)]
    pub where_clause: Option<String>,
    /// Names of the units this table references
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Redshift placement hints
    #[serde(default)]
    pub redshift: Option<RedshiftOptions>,
    /// Snowflake clustering hints
    #[serde(default)]
    pub snowflake: Option<SnowflakeOptions>,
    /// Definition file this table was compiled from, relative to the project root
    #[serde(default)]
    pub file_path: String,
}

impl Table {
    /// Create a table with only the required fields set
    pub fn new(
        name: impl Into<String>,
        target: Target,
        table_type: TableType,
        query: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            table_type,
            query: query.into(),
            incremental_query: None,
            where_clause: None,
            dependencies: Vec::new(),
            redshift: None,
            snowflake: None,
            file_path: String::new(),
        }
    }

    /// Query for incremental inserts, falling back to the full query
    pub fn insert_query(&self) -> &str {
        self.incremental_query.as_deref().unwrap_or(&self.query)
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;

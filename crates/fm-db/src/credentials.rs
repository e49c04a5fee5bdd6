//! Warehouse credentials and the connector registry

use crate::duckdb::DuckDbWarehouse;
use crate::error::{DbError, DbResult};
use crate::redshift::RedshiftWarehouse;
use crate::snowflake::SnowflakeWarehouse;
use crate::traits::Warehouse;
use fm_core::WarehouseKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for one warehouse, tagged by warehouse kind.
///
/// ```json
/// {"warehouse": "duckdb", "path": "warehouse.duckdb"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "warehouse", rename_all = "lowercase")]
pub enum Credentials {
    /// DuckDB database file; empty or `:memory:` for an in-memory database
    DuckDb {
        #[serde(default)]
        path: String,
    },
    Redshift(RedshiftCredentials),
    Snowflake(SnowflakeCredentials),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedshiftCredentials {
    pub host: String,
    #[serde(default = "default_redshift_port")]
    pub port: u16,
    pub database_name: String,
    pub username: String,
    pub password: String,
}

fn default_redshift_port() -> u16 {
    5439
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowflakeCredentials {
    pub account_id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    pub database_name: String,
    pub warehouse: String,
}

impl Credentials {
    /// In-memory DuckDB
    pub fn duckdb_in_memory() -> Self {
        Credentials::DuckDb {
            path: ":memory:".to_string(),
        }
    }

    /// The warehouse kind these credentials connect to
    pub fn kind(&self) -> WarehouseKind {
        match self {
            Credentials::DuckDb { .. } => WarehouseKind::DuckDb,
            Credentials::Redshift(_) => WarehouseKind::Redshift,
            Credentials::Snowflake(_) => WarehouseKind::Snowflake,
        }
    }

    /// Parse credentials from JSON
    pub fn parse(content: &str) -> DbResult<Self> {
        serde_json::from_str(content).map_err(|e| DbError::InvalidCredentials(e.to_string()))
    }

    /// Load credentials from a JSON file
    pub fn load(path: &Path) -> DbResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DbError::InvalidCredentials(format!("{}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Open a connector for `warehouse` with `credentials`
pub fn connect(credentials: &Credentials, warehouse: WarehouseKind) -> DbResult<Box<dyn Warehouse>> {
    if credentials.kind() != warehouse {
        return Err(DbError::CredentialsMismatch {
            credentials: credentials.kind().to_string(),
            warehouse: warehouse.to_string(),
        });
    }

    log::debug!("Connecting to {} warehouse", warehouse);
    let connector: Box<dyn Warehouse> = match credentials {
        Credentials::DuckDb { path } => Box::new(DuckDbWarehouse::new(path)?),
        Credentials::Redshift(c) => Box::new(RedshiftWarehouse::new(c)),
        Credentials::Snowflake(c) => Box::new(SnowflakeWarehouse::new(c)),
    };
    Ok(connector)
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;

//! Snowflake connector stub

use crate::credentials::SnowflakeCredentials;
use crate::error::{DbError, DbResult};
use crate::traits::{ExecuteOptions, Row, Warehouse};
use async_trait::async_trait;
use fm_core::{TableMetadata, Target, WarehouseKind};

/// Snowflake connector (stub implementation)
pub(crate) struct SnowflakeWarehouse;

impl SnowflakeWarehouse {
    pub(crate) fn new(credentials: &SnowflakeCredentials) -> Self {
        log::debug!(
            "Snowflake connector for account {} is a stub",
            credentials.account_id
        );
        Self
    }
}

#[async_trait]
impl Warehouse for SnowflakeWarehouse {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::Snowflake
    }

    async fn execute(&self, _sql: &str, _options: ExecuteOptions) -> DbResult<Vec<Row>> {
        Err(DbError::not_implemented("snowflake", "execute"))
    }

    async fn evaluate(&self, _sql: &str) -> DbResult<()> {
        Err(DbError::not_implemented("snowflake", "evaluate"))
    }

    async fn table_metadata(&self, _target: &Target) -> DbResult<Option<TableMetadata>> {
        Err(DbError::not_implemented("snowflake", "table_metadata"))
    }

    async fn create_schema_if_not_exists(&self, _schema: &str) -> DbResult<()> {
        Err(DbError::not_implemented("snowflake", "create_schema_if_not_exists"))
    }
}

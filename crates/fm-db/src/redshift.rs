//! Redshift connector stub

use crate::credentials::RedshiftCredentials;
use crate::error::{DbError, DbResult};
use crate::traits::{ExecuteOptions, Row, Warehouse};
use async_trait::async_trait;
use fm_core::{TableMetadata, Target, WarehouseKind};

/// Redshift connector (stub implementation)
///
/// SQL generation for Redshift is complete; running it is not.
pub(crate) struct RedshiftWarehouse;

impl RedshiftWarehouse {
    pub(crate) fn new(credentials: &RedshiftCredentials) -> Self {
        log::debug!(
            "Redshift connector for {}:{}/{} is a stub",
            credentials.host,
            credentials.port,
            credentials.database_name
        );
        Self
    }
}

#[async_trait]
impl Warehouse for RedshiftWarehouse {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::Redshift
    }

    async fn execute(&self, _sql: &str, _options: ExecuteOptions) -> DbResult<Vec<Row>> {
        Err(DbError::not_implemented("redshift", "execute"))
    }

    async fn evaluate(&self, _sql: &str) -> DbResult<()> {
        Err(DbError::not_implemented("redshift", "evaluate"))
    }

    async fn table_metadata(&self, _target: &Target) -> DbResult<Option<TableMetadata>> {
        Err(DbError::not_implemented("redshift", "table_metadata"))
    }

    async fn create_schema_if_not_exists(&self, _schema: &str) -> DbResult<()> {
        Err(DbError::not_implemented("redshift", "create_schema_if_not_exists"))
    }
}

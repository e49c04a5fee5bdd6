//! Warehouse connector trait

use crate::error::DbResult;
use async_trait::async_trait;
use fm_core::{TableMetadata, Target, WarehouseKind};
use tokio_util::sync::CancellationToken;

/// One result row, keyed by column name in select order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Per-call execution options
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Token observed while the call is in flight
    pub cancel: Option<CancellationToken>,
    /// The query was issued by a person waiting on the result
    pub interactive: bool,
    /// Upper bound on the number of rows returned
    pub max_results: Option<usize>,
}

impl ExecuteOptions {
    /// Interactive execution observing `cancel`
    pub fn interactive(cancel: CancellationToken, max_results: Option<usize>) -> Self {
        Self {
            cancel: Some(cancel),
            interactive: true,
            max_results,
        }
    }

    /// Non-interactive execution observing `cancel`, as used for task plans
    pub fn batch(cancel: CancellationToken) -> Self {
        Self {
            cancel: Some(cancel),
            ..Default::default()
        }
    }
}

/// Warehouse connector.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Which warehouse this connector talks to
    fn kind(&self) -> WarehouseKind;

    /// Execute one statement and return its rows.
    ///
    /// Returns `DbError::Cancelled` when the options' token fires first.
    async fn execute(&self, sql: &str, options: ExecuteOptions) -> DbResult<Vec<Row>>;

    /// Validate a statement without running it
    async fn evaluate(&self, sql: &str) -> DbResult<()>;

    /// Introspect the object at `target`, `None` when nothing exists there
    async fn table_metadata(&self, target: &Target) -> DbResult<Option<TableMetadata>>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;
}

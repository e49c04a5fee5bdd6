//! DuckDB warehouse connector

use crate::error::{DbError, DbResult};
use crate::traits::{ExecuteOptions, Row, Warehouse};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{Connection, InterruptHandle};
use fm_core::{Field, ObjectKind, TableMetadata, Target, WarehouseKind};
use serde_json::Value as Json;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long a cancelled call waits for its statement to stop before the
/// interrupt is sent again
const INTERRUPT_RETRY: Duration = Duration::from_millis(50);

/// DuckDB warehouse connector.
///
/// Calls run on the blocking pool. Cancelling a call interrupts its statement
/// and returns once the connection is free again.
pub struct DuckDbWarehouse {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl DuckDbWarehouse {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path.is_empty() || path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            interrupt: conn.interrupt_handle(),
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool
    async fn blocking<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock(&conn)?;
            f(&guard)
        })
        .await
        .map_err(|e| DbError::Internal(e.to_string()))?
    }
}

fn lock(conn: &Mutex<Connection>) -> DbResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| DbError::MutexPoisoned(e.to_string()))
}

/// Run a statement and collect up to `max_results` rows.
///
/// Column names are read after the rows: DuckDB only knows them once the
/// statement has executed.
fn query_rows(conn: &Connection, sql: &str, max_results: Option<usize>) -> DbResult<Vec<Row>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

    let values: Vec<Vec<Json>> = stmt
        .query_map([], |row| {
            let column_count = row.as_ref().column_count();
            (0..column_count)
                .map(|i| row.get::<_, Value>(i).map(value_to_json))
                .collect::<duckdb::Result<Vec<Json>>>()
        })?
        .take(max_results.unwrap_or(usize::MAX))
        .collect::<Result<_, _>>()?;

    let column_names: Vec<String> = (0..stmt.column_count())
        .map(|i| stmt.column_name(i).map_or("?".to_string(), |n| n.to_string()))
        .collect();

    Ok(values
        .into_iter()
        .map(|row| column_names.iter().cloned().zip(row).collect())
        .collect())
}

/// Convert a DuckDB value to JSON.
///
/// Integers that do not fit in an `i64` and decimals become strings.
fn value_to_json(value: Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(b),
        Value::TinyInt(n) => Json::from(n),
        Value::SmallInt(n) => Json::from(n),
        Value::Int(n) => Json::from(n),
        Value::BigInt(n) => Json::from(n),
        Value::UTinyInt(n) => Json::from(n),
        Value::USmallInt(n) => Json::from(n),
        Value::UInt(n) => Json::from(n),
        Value::UBigInt(n) => Json::from(n),
        Value::HugeInt(n) => match i64::try_from(n) {
            Ok(n) => Json::from(n),
            Err(_) => Json::String(n.to_string()),
        },
        Value::Float(f) => Json::from(f64::from(f)),
        Value::Double(f) => Json::from(f),
        Value::Decimal(d) => Json::String(d.to_string()),
        Value::Text(s) | Value::Enum(s) => Json::String(s),
        Value::List(items) => {
            Json::Array(items.into_iter().map(value_to_json).collect())
        }
        other => Json::String(format!("{other:?}")),
    }
}

fn object_kind(table_type: &str) -> ObjectKind {
    if table_type.eq_ignore_ascii_case("VIEW") {
        ObjectKind::View
    } else {
        ObjectKind::Table
    }
}

fn table_metadata_sync(conn: &Connection, target: &Target) -> DbResult<Option<TableMetadata>> {
    let mut tables = conn.prepare(
        "select table_type from information_schema.tables \
         where table_schema = ? and table_name = ?",
    )?;
    let table_type: Option<String> = tables
        .query_map([target.schema.as_str(), target.name.as_str()], |row| {
            row.get::<_, String>(0)
        })?
        .next()
        .transpose()?;

    let Some(table_type) = table_type else {
        return Ok(None);
    };

    let mut columns = conn.prepare(
        "select column_name, data_type from information_schema.columns \
         where table_schema = ? and table_name = ? order by ordinal_position",
    )?;
    let fields = columns
        .query_map([target.schema.as_str(), target.name.as_str()], |row| {
            Ok(Field {
                name: row.get(0)?,
                data_type: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(TableMetadata {
        target: target.clone(),
        kind: object_kind(&table_type),
        fields,
    }))
}

#[async_trait]
impl Warehouse for DuckDbWarehouse {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::DuckDb
    }

    async fn execute(&self, sql: &str, options: ExecuteOptions) -> DbResult<Vec<Row>> {
        let cancel = options.cancel.unwrap_or_default();
        if cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }

        log::debug!(
            "duckdb execute (interactive: {}, max_results: {:?}): {}",
            options.interactive,
            options.max_results,
            sql
        );

        let sql = sql.to_string();
        let max_results = options.max_results;
        let started = cancel.clone();
        let call = self.blocking(move |conn| {
            if started.is_cancelled() {
                return Err(DbError::Cancelled);
            }
            query_rows(conn, &sql, max_results)
        });
        tokio::pin!(call);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("duckdb execute cancelled, interrupting in-flight statement");
                // An interrupt sent before the statement starts is lost, so
                // keep sending until the call has returned.
                loop {
                    self.interrupt.interrupt();
                    if tokio::time::timeout(INTERRUPT_RETRY, &mut call).await.is_ok() {
                        break;
                    }
                }
                Err(DbError::Cancelled)
            }
            rows = &mut call => rows,
        }
    }

    async fn evaluate(&self, sql: &str) -> DbResult<()> {
        let sql = sql.to_string();
        self.blocking(move |conn| {
            conn.prepare(&sql)
                .map(|_| ())
                .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
        })
        .await
    }

    async fn table_metadata(&self, target: &Target) -> DbResult<Option<TableMetadata>> {
        let target = target.clone();
        self.blocking(move |conn| table_metadata_sync(conn, &target))
            .await
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let sql = format!(
            "create schema if not exists {}",
            fm_core::sql_utils::quote_ident(schema)
        );
        self.blocking(move |conn| conn.execute(&sql, []).map(|_| ()).map_err(DbError::from))
            .await
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

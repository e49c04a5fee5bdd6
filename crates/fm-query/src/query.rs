//! Ad-hoc query pipeline: compile, connect, execute.

use crate::error::{QueryError, QueryResult};
use fm_compile::{compile, CompileOrchestrator, CompileResult};
use fm_core::{CompileConfig, WarehouseKind};
use fm_db::{connect, Credentials, DbError, ExecuteOptions, Row};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How a cancellable operation ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation ran to completion
    Completed(T),
    /// The operation was cancelled before it produced a result
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The completed value, if any
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// Options for [`run`]
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Project to compile the query against; `None` runs it verbatim
    pub compile_config: Option<CompileConfig>,
    /// Upper bound on the number of rows returned
    pub max_results: Option<usize>,
    /// Worker used to compile; `None` locates `fm-compile-worker`
    pub orchestrator: Option<CompileOrchestrator>,
}

/// Handle to a running query
#[derive(Debug)]
pub struct CancellableQuery {
    id: Uuid,
    cancel: CancellationToken,
    handle: JoinHandle<QueryResult<Outcome<Vec<Row>>>>,
}

impl CancellableQuery {
    /// Invocation id used in log lines for this query
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request cancellation. Safe to call at any time, any number of times.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            log::info!("Cancelling query {}", self.id);
        }
        self.cancel.cancel();
    }

    /// A token that cancels this query when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the query to finish
    pub async fn wait(self) -> QueryResult<Outcome<Vec<Row>>> {
        self.handle
            .await
            .map_err(|e| QueryError::TaskJoin(e.to_string()))?
    }
}

/// Compile `query` and run it on `warehouse`.
///
/// Must be called from within a tokio runtime. The returned handle can cancel
/// the run at any point; a cancelled run resolves to `Outcome::Cancelled`.
pub fn run(
    credentials: Credentials,
    warehouse: WarehouseKind,
    query: impl Into<String>,
    options: QueryOptions,
) -> CancellableQuery {
    let id = Uuid::new_v4();
    let cancel = CancellationToken::new();
    let query = query.into();

    let token = cancel.clone();
    let handle = tokio::spawn(async move {
        log::debug!("Query {} started on {}", id, warehouse);
        let result = run_pipeline(&credentials, warehouse, &query, options, &token).await;
        match &result {
            Ok(Outcome::Completed(rows)) => {
                log::debug!("Query {} returned {} row(s)", id, rows.len())
            }
            Ok(Outcome::Cancelled) => log::info!("Query {} cancelled", id),
            Err(e) => log::debug!("Query {} failed: {}", id, e),
        }
        result
    });

    CancellableQuery { id, cancel, handle }
}

async fn run_pipeline(
    credentials: &Credentials,
    warehouse: WarehouseKind,
    query: &str,
    options: QueryOptions,
    cancel: &CancellationToken,
) -> QueryResult<Outcome<Vec<Row>>> {
    // Dropping the compile future kills the worker process.
    let compiled = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(Outcome::Cancelled),
        compiled = compile_query(query, &options) => compiled?,
    };

    let connector = connect(credentials, warehouse)?;

    if cancel.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    let execute = ExecuteOptions::interactive(cancel.clone(), options.max_results);
    match connector.execute(&compiled, execute).await {
        Ok(rows) => Ok(Outcome::Completed(rows)),
        Err(DbError::Cancelled) => Ok(Outcome::Cancelled),
        Err(e) => Err(e.into()),
    }
}

async fn compile_query(query: &str, options: &QueryOptions) -> CompileResult<String> {
    let config = options.compile_config.as_ref();
    match &options.orchestrator {
        Some(orchestrator) => orchestrator.compile(query, config).await,
        None => compile(query, config).await,
    }
}

/// Compile `query` and validate it on `warehouse` without running it
pub async fn evaluate(
    credentials: &Credentials,
    warehouse: WarehouseKind,
    query: &str,
    compile_config: Option<&CompileConfig>,
) -> QueryResult<()> {
    let options = QueryOptions {
        compile_config: compile_config.cloned(),
        ..Default::default()
    };
    evaluate_with(credentials, warehouse, query, &options).await
}

/// [`evaluate`] with the compile settings of `options`; `max_results` is ignored
pub async fn evaluate_with(
    credentials: &Credentials,
    warehouse: WarehouseKind,
    query: &str,
    options: &QueryOptions,
) -> QueryResult<()> {
    let compiled = compile_query(query, options).await?;
    connect(credentials, warehouse)?.evaluate(&compiled).await?;
    Ok(())
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

//! Running adapter task plans against a warehouse connector.

use crate::error::{QueryError, QueryResult};
use crate::query::Outcome;
use fm_adapter::adapter_for;
use fm_core::{Assertion, ProjectConfig, RunConfig, Table, TaskKind, Tasks};
use fm_db::{DbError, ExecuteOptions, Row, Warehouse};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Counts of tasks run by a completed plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskReport {
    pub statements: usize,
    pub assertions: usize,
}

/// Run `tasks` strictly in order.
///
/// Statement results are discarded. An assertion task stops the plan with
/// `QueryError::AssertionFailed` when its `row_count` is non-zero. The token
/// is checked before every task and observed during each call.
pub async fn execute_tasks(
    warehouse: &dyn Warehouse,
    tasks: Tasks,
    cancel: &CancellationToken,
) -> QueryResult<Outcome<TaskReport>> {
    let total = tasks.len();
    let mut report = TaskReport::default();

    for (idx, task) in tasks.into_iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("Plan cancelled after {} of {} task(s)", idx, total);
            return Ok(Outcome::Cancelled);
        }

        log::debug!("Task {}/{}: {}", idx + 1, total, task.sql);
        let rows = match warehouse
            .execute(&task.sql, ExecuteOptions::batch(cancel.clone()))
            .await
        {
            Ok(rows) => rows,
            Err(DbError::Cancelled) => return Ok(Outcome::Cancelled),
            Err(e) => return Err(e.into()),
        };

        match task.kind {
            TaskKind::Statement => report.statements += 1,
            TaskKind::Assertion => {
                let row_count = violating_rows(&rows)
                    .ok_or_else(|| QueryError::InvalidAssertionResult {
                        sql: task.sql.clone(),
                    })?;
                if row_count != 0 {
                    return Err(QueryError::AssertionFailed {
                        sql: task.sql,
                        row_count,
                    });
                }
                report.assertions += 1;
            }
        }
    }

    Ok(Outcome::Completed(report))
}

/// The `row_count` of an assertion check. A NULL count or an empty result
/// means no violating rows.
fn violating_rows(rows: &[Row]) -> Option<i64> {
    let Some(first) = rows.first() else {
        return Some(0);
    };
    match first.get("row_count")? {
        Value::Null => Some(0),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i128>()
            .ok()
            .map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
        _ => None,
    }
}

/// Publish `table`: introspect its target, plan with the warehouse's adapter,
/// run the plan
pub async fn publish_table(
    warehouse: &dyn Warehouse,
    table: &Table,
    run_config: &RunConfig,
    cancel: &CancellationToken,
) -> QueryResult<Outcome<TaskReport>> {
    if cancel.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    warehouse
        .create_schema_if_not_exists(&table.target.schema)
        .await?;
    let metadata = warehouse.table_metadata(&table.target).await?;
    let tasks = adapter_for(warehouse.kind()).publish_tasks(table, run_config, metadata.as_ref());

    log::info!(
        "Publishing {} ({} task(s), {})",
        table.target,
        tasks.len(),
        if metadata.is_some() { "exists" } else { "new" }
    );
    execute_tasks(warehouse, tasks, cancel).await
}

/// Create the assertion view and check it for violating rows
pub async fn run_assertion(
    warehouse: &dyn Warehouse,
    assertion: &Assertion,
    project_config: &ProjectConfig,
    cancel: &CancellationToken,
) -> QueryResult<Outcome<TaskReport>> {
    if cancel.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    let target = assertion.resolved_target(project_config);
    warehouse.create_schema_if_not_exists(&target.schema).await?;
    let tasks = adapter_for(warehouse.kind()).assert_tasks(assertion, project_config);

    log::info!("Running assertion {}", target);
    execute_tasks(warehouse, tasks, cancel).await
}

#[cfg(test)]
#[path = "execution_test.rs"]
mod tests;

use super::*;
use fm_compile::CompileError;
use fm_db::DbError;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

fn duckdb() -> Credentials {
    Credentials::duckdb_in_memory()
}

#[tokio::test]
async fn test_run_without_project_executes_query_verbatim() {
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select 1 as id, 'a' as label",
        QueryOptions::default(),
    );
    let rows = query.wait().await.unwrap().completed().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[0]["label"], json!("a"));
}

#[tokio::test]
async fn test_run_empty_project_dir_is_not_compiled() {
    let options = QueryOptions {
        compile_config: Some(CompileConfig::default()),
        ..Default::default()
    };
    let query = run(duckdb(), WarehouseKind::DuckDb, "select 7 as n", options);
    let rows = query.wait().await.unwrap().completed().unwrap();
    assert_eq!(rows[0]["n"], json!(7));
}

#[tokio::test]
async fn test_run_caps_rows() {
    let options = QueryOptions {
        max_results: Some(2),
        ..Default::default()
    };
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select * from range(100) t(n)",
        options,
    );
    let rows = query.wait().await.unwrap().completed().unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_cancel_before_start_resolves_cancelled() {
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select 1",
        QueryOptions::default(),
    );
    query.cancel();
    query.cancel();

    let outcome = query.wait().await.unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
}

#[tokio::test]
async fn test_cancel_through_shared_token() {
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select 1",
        QueryOptions::default(),
    );
    query.cancellation_token().cancel();
    assert!(query.wait().await.unwrap().is_cancelled());
}

#[tokio::test]
async fn test_run_credentials_mismatch() {
    let query = run(
        duckdb(),
        WarehouseKind::Redshift,
        "select 1",
        QueryOptions::default(),
    );
    let err = query.wait().await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Database(DbError::CredentialsMismatch { .. })
    ));
}

#[tokio::test]
async fn test_run_execution_error_is_database_error() {
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select * from not_a_table",
        QueryOptions::default(),
    );
    let err = query.wait().await.unwrap_err();
    assert!(matches!(err, QueryError::Database(DbError::ExecutionError(_))));
    assert!(err.to_string().starts_with("[Q002] [D002]"));
}

#[tokio::test]
async fn test_queries_have_distinct_ids() {
    let a = run(duckdb(), WarehouseKind::DuckDb, "select 1", QueryOptions::default());
    let b = run(duckdb(), WarehouseKind::DuckDb, "select 1", QueryOptions::default());
    assert_ne!(a.id(), b.id());
    a.wait().await.unwrap();
    b.wait().await.unwrap();
}

#[tokio::test]
async fn test_evaluate() {
    evaluate(&duckdb(), WarehouseKind::DuckDb, "select 1 as ok", None)
        .await
        .unwrap();

    let err = evaluate(&duckdb(), WarehouseKind::DuckDb, "select from from", None)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Database(_)));
}

/// A stand-in compile worker: a shell script running `body`
#[cfg(unix)]
fn fake_worker(dir: &Path, body: &str) -> CompileOrchestrator {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-compile-worker");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    CompileOrchestrator::new(path)
}

#[cfg(unix)]
fn project_options(dir: &Path, orchestrator: CompileOrchestrator) -> QueryOptions {
    QueryOptions {
        compile_config: Some(CompileConfig::for_project(dir.display().to_string())),
        orchestrator: Some(orchestrator),
        ..Default::default()
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_executes_compiled_query() {
    let dir = tempfile::tempdir().unwrap();
    let worker = fake_worker(dir.path(), "cat > /dev/null\nprintf 'select 42 as answer'");

    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select {{ ref('anything') }}",
        project_options(dir.path(), worker),
    );
    let rows = query.wait().await.unwrap().completed().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["answer"], json!(42));
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_worker_failure_is_compile_error() {
    let dir = tempfile::tempdir().unwrap();
    let worker = fake_worker(dir.path(), "cat > /dev/null\necho 'bad project' >&2\nexit 3");

    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select 1",
        project_options(dir.path(), worker),
    );
    let err = query.wait().await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Compile(CompileError::WorkerFailed { .. })
    ));
    assert!(err.to_string().contains("bad project"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_cancel_during_compile() {
    let dir = tempfile::tempdir().unwrap();
    let worker = fake_worker(dir.path(), "exec sleep 30");

    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select 1",
        project_options(dir.path(), worker),
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    query.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(5), query.wait())
        .await
        .expect("cancel did not stop the compile worker")
        .unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_interrupts_running_query() {
    let query = run(
        duckdb(),
        WarehouseKind::DuckDb,
        "select count(*) from range(10000000) t1, range(1000000) t2",
        QueryOptions::default(),
    );
    tokio::time::sleep(Duration::from_millis(200)).await;
    query.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(30), query.wait())
        .await
        .expect("query kept running after cancel")
        .unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
}

#[cfg(unix)]
#[tokio::test]
async fn test_evaluate_with_project() {
    let dir = tempfile::tempdir().unwrap();

    let valid = fake_worker(dir.path(), "cat > /dev/null\nprintf 'select 1 as ok'");
    evaluate_with(
        &duckdb(),
        WarehouseKind::DuckDb,
        "select {{ ref('a') }}",
        &project_options(dir.path(), valid),
    )
    .await
    .unwrap();

    let other = tempfile::tempdir().unwrap();
    let invalid = fake_worker(other.path(), "cat > /dev/null\nprintf 'select * from missing_table'");
    let err = evaluate_with(
        &duckdb(),
        WarehouseKind::DuckDb,
        "select 1",
        &project_options(other.path(), invalid),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, QueryError::Database(DbError::ExecutionError(_))));
}

#[test]
fn test_outcome_helpers() {
    assert_eq!(Outcome::Completed(3).completed(), Some(3));
    assert!(!Outcome::Completed(3).is_cancelled());
    assert_eq!(Outcome::<i32>::Cancelled.completed(), None);
    assert!(Outcome::<i32>::Cancelled.is_cancelled());
}

//! Integration tests for the compile worker process

use fm_compile::{CompileError, CompileOrchestrator};
use fm_core::{CompileConfig, CompiledGraph, TableType, Target};
use std::path::Path;

fn orchestrator() -> CompileOrchestrator {
    CompileOrchestrator::new(env!("CARGO_BIN_EXE_fm-compile-worker"))
}

fn sample_config() -> CompileConfig {
    CompileConfig::for_project("tests/fixtures/sample_project")
}

#[tokio::test]
async fn test_compile_sample_project_graph() {
    let graph: CompiledGraph = orchestrator()
        .compile_graph(&sample_config())
        .await
        .unwrap();

    assert_eq!(graph.project_config.name, "sample_project");
    assert_eq!(graph.tables.len(), 3);
    assert_eq!(graph.assertions.len(), 1);

    let orders = graph.table("orders").unwrap();
    assert_eq!(orders.table_type, TableType::Table);
    assert_eq!(orders.target, Target::new("analytics", "orders"));
    assert!(orders.query.contains("(amount_cents / 100.0) as amount"));
    assert!(orders.query.contains(r#"from "staging"."stg_orders""#));
    assert!(orders.query.contains("amount_cents >= 0"));

    let events = graph.table("order_events").unwrap();
    assert_eq!(events.table_type, TableType::Incremental);
    assert_eq!(events.where_clause.as_deref(), Some("created_at is not null"));
    assert!(events
        .incremental_query
        .as_deref()
        .unwrap()
        .contains(r#"select max(created_at) from "analytics"."order_events""#));

    let assertion = graph.assertion("orders_non_negative").unwrap();
    assert_eq!(assertion.target, Some(Target::new("qa", "orders_non_negative")));

    assert_eq!(graph.compile_errors.len(), 1);
    assert_eq!(graph.compile_errors[0].path, "definitions/broken.sql");
}

#[tokio::test]
async fn test_compile_query_against_project() {
    let sql = orchestrator()
        .compile(
            "select count(*) from {{ ref('orders') }}",
            Some(&sample_config()),
        )
        .await
        .unwrap();
    assert_eq!(sql, r#"select count(*) from "analytics"."orders""#);
}

#[tokio::test]
async fn test_compile_query_with_suffix() {
    let mut config = sample_config();
    config.schema_suffix_override = Some("dev".to_string());

    let sql = orchestrator()
        .compile("select * from {{ ref('stg_orders') }}", Some(&config))
        .await
        .unwrap();
    assert_eq!(sql, r#"select * from "staging_dev"."stg_orders""#);
}

#[tokio::test]
async fn test_compile_error_comes_back_as_text() {
    let text = orchestrator()
        .compile("select * from {{ ref('nope') }}", Some(&sample_config()))
        .await
        .unwrap();
    assert!(text.contains("Unknown reference 'nope'"));
}

#[tokio::test]
async fn test_worker_failure_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(!Path::new(&dir.path().join("forma.yml")).exists());

    let config = CompileConfig::for_project(dir.path().display().to_string());
    let err = orchestrator()
        .compile("select 1", Some(&config))
        .await
        .unwrap_err();

    match err {
        CompileError::WorkerFailed { stderr, .. } => assert!(stderr.contains("E001")),
        other => panic!("expected WorkerFailed, got {other}"),
    }
}

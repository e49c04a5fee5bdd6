use super::*;
use crate::traits::ExecuteOptions;

fn redshift() -> Credentials {
    Credentials::parse(
        r#"{"warehouse":"redshift","host":"cluster.local","database_name":"dev","username":"u","password":"p"}"#,
    )
    .unwrap()
}

#[test]
fn test_parse_duckdb() {
    let creds = Credentials::parse(r#"{"warehouse":"duckdb","path":"local.duckdb"}"#).unwrap();
    assert_eq!(
        creds,
        Credentials::DuckDb {
            path: "local.duckdb".to_string()
        }
    );
    assert_eq!(creds.kind(), WarehouseKind::DuckDb);
}

#[test]
fn test_parse_redshift_default_port() {
    match redshift() {
        Credentials::Redshift(c) => assert_eq!(c.port, 5439),
        other => panic!("expected redshift credentials, got {other:?}"),
    }
}

#[test]
fn test_parse_unknown_warehouse() {
    let err = Credentials::parse(r#"{"warehouse":"bigquery"}"#).unwrap_err();
    assert!(matches!(err, DbError::InvalidCredentials(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Credentials::load(&dir.path().join("creds.json")).unwrap_err();
    assert!(err.to_string().contains("[D008]"));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("creds.json");
    std::fs::write(&path, r#"{"warehouse":"duckdb"}"#).unwrap();
    assert_eq!(
        Credentials::load(&path).unwrap(),
        Credentials::DuckDb {
            path: String::new()
        }
    );
}

#[test]
fn test_connect_mismatch() {
    let err = connect(&Credentials::duckdb_in_memory(), WarehouseKind::Snowflake)
        .err()
        .unwrap();
    assert!(matches!(err, DbError::CredentialsMismatch { .. }));
    assert!(err.to_string().contains("duckdb credentials"));
}

#[tokio::test]
async fn test_connect_duckdb() {
    let warehouse = connect(&Credentials::duckdb_in_memory(), WarehouseKind::DuckDb).unwrap();
    assert_eq!(warehouse.kind(), WarehouseKind::DuckDb);
    let rows = warehouse
        .execute("select 2 as two", ExecuteOptions::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_connect_stub_reports_not_implemented() {
    let warehouse = connect(&redshift(), WarehouseKind::Redshift).unwrap();
    assert_eq!(warehouse.kind(), WarehouseKind::Redshift);
    let err = warehouse
        .execute("select 1", ExecuteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotImplemented { .. }));
}

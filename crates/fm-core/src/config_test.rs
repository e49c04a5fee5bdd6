use super::*;

#[test]
fn test_parse_minimal_config() {
    let config = ProjectConfig::parse("name: test_project").unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.warehouse, WarehouseKind::DuckDb);
    assert_eq!(config.default_schema, "forma");
    assert_eq!(config.assertion_schema, "forma_assertions");
    assert!(config.schema_suffix.is_none());
    assert!(config.vars.is_empty());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: my_analytics_project
warehouse: redshift
default_schema: analytics
assertion_schema: qa
schema_suffix: dev
vars:
  start_date: "2024-01-01"
"#;
    let config = ProjectConfig::parse(yaml).unwrap();
    assert_eq!(config.warehouse, WarehouseKind::Redshift);
    assert_eq!(config.default_schema, "analytics");
    assert_eq!(config.assertion_schema, "qa");
    assert_eq!(config.schema_suffix.as_deref(), Some("dev"));
    assert_eq!(config.get_var("start_date"), Some("2024-01-01"));
}

#[test]
fn test_parse_rejects_unknown_fields() {
    let err = ProjectConfig::parse("name: x\nmaterialization: table").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_parse_rejects_unknown_warehouse() {
    let err = ProjectConfig::parse("name: x\nwarehouse: oracle").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_validate_empty_name() {
    let err = ProjectConfig::parse("name: ''").unwrap_err();
    assert!(err.to_string().contains("[E003]"));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("forma.yml"), "name: from_yml").unwrap();
    std::fs::write(dir.path().join("forma.yaml"), "name: from_yaml").unwrap();

    let config = ProjectConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yml");
}

#[test]
fn test_load_from_dir_accepts_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("forma.yaml"), "name: from_yaml").unwrap();

    let config = ProjectConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProjectConfig::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_override_schema_suffix_ignores_empty() {
    let mut config = ProjectConfig::parse("name: x\nschema_suffix: prod").unwrap();
    config.override_schema_suffix("");
    assert_eq!(config.schema_suffix.as_deref(), Some("prod"));
    config.override_schema_suffix("dev");
    assert_eq!(config.schema_suffix.as_deref(), Some("dev"));
}

#[test]
fn test_merge_is_shallow() {
    let mut config = ProjectConfig::parse(
        "name: x\ndefault_schema: base\nvars:\n  a: \"1\"\n  b: \"2\"",
    )
    .unwrap();
    let overrides = ProjectConfigOverride {
        default_schema: Some("override".to_string()),
        vars: Some(BTreeMap::from([("c".to_string(), "3".to_string())])),
        ..Default::default()
    };
    config.merge(overrides);

    assert_eq!(config.name, "x");
    assert_eq!(config.default_schema, "override");
    // vars are replaced as a whole, not merged key by key
    assert_eq!(config.vars.len(), 1);
    assert_eq!(config.get_var("c"), Some("3"));
}

#[test]
fn test_merge_empty_override_is_noop() {
    let mut config = ProjectConfig::parse("name: x").unwrap();
    let before = config.clone();
    config.merge(ProjectConfigOverride::default());
    assert_eq!(config, before);
    assert!(ProjectConfigOverride::default().is_empty());
}

#[test]
fn test_override_parses_from_json() {
    let overrides: ProjectConfigOverride =
        serde_json::from_str(r#"{"warehouse":"snowflake","schema_suffix":"ci"}"#).unwrap();
    assert_eq!(overrides.warehouse, Some(WarehouseKind::Snowflake));
    assert_eq!(overrides.schema_suffix.as_deref(), Some("ci"));
}

#[test]
fn test_suffixed_schema() {
    let mut config = ProjectConfig::default();
    assert_eq!(config.suffixed_schema("analytics"), "analytics");
    config.schema_suffix = Some("dev".to_string());
    assert_eq!(config.suffixed_schema("analytics"), "analytics_dev");
    config.schema_suffix = Some(String::new());
    assert_eq!(config.suffixed_schema("analytics"), "analytics");
}

#[test]
fn test_run_config_default_is_incremental() {
    assert!(!RunConfig::default().full_refresh);
    assert!(RunConfig::full_refresh().full_refresh);
}

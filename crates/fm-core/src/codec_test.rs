use super::*;
use crate::compile_config::{CompileConfig, GenerateIndexConfig};
use crate::config::ProjectConfigOverride;
use crate::warehouse::WarehouseKind;

fn sample_index_config() -> GenerateIndexConfig {
    GenerateIndexConfig {
        include_paths: vec!["includes/helpers.sql".to_string()],
        definition_paths: vec![
            "definitions/orders.sql".to_string(),
            "definitions/customers.sql".to_string(),
        ],
        compile_config: CompileConfig {
            project_dir: Some("/work/project".to_string()),
            query: Some("select * from {{ ref('orders') }}".to_string()),
            schema_suffix_override: Some("dev".to_string()),
            project_config_override: ProjectConfigOverride {
                warehouse: Some(WarehouseKind::Redshift),
                ..Default::default()
            },
            return_override: None,
        },
    }
}

#[test]
fn test_base64_message_survives_transport() {
    let config = sample_index_config();
    let encoded = encode_base64(&config, "GenerateIndexConfig").unwrap();
    assert!(encoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));

    // Worker stdin/stdout usually carries a trailing newline
    let decoded: GenerateIndexConfig =
        decode_base64(&format!("{}\n", encoded), "GenerateIndexConfig").unwrap();
    assert_eq!(decoded, config);
}

#[test]
fn test_decode_invalid_base64() {
    let err = decode_base64::<GenerateIndexConfig>("not base64!!", "GenerateIndexConfig")
        .unwrap_err();
    match err {
        CoreError::Decode {
            message_type,
            details,
        } => {
            assert_eq!(message_type, "GenerateIndexConfig");
            assert!(details.contains("invalid base64"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_decode_truncated_message() {
    let bytes = encode(&sample_index_config(), "GenerateIndexConfig").unwrap();
    let err = decode::<GenerateIndexConfig>(&bytes[..bytes.len() / 2], "GenerateIndexConfig")
        .unwrap_err();
    assert!(matches!(err, CoreError::Decode { .. }));
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let mut bytes = encode(&CompileConfig::default(), "CompileConfig").unwrap();
    bytes.extend_from_slice(&[0, 0, 0]);
    let err = decode::<CompileConfig>(&bytes, "CompileConfig").unwrap_err();
    assert!(err.to_string().contains("trailing bytes"));
}

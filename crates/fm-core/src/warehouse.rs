//! Supported warehouse kinds.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Warehouse (SQL dialect) selector.
///
/// This is a closed set: adapters and connectors are resolved from it once,
/// and unknown names are rejected when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseKind {
    /// Amazon Redshift
    Redshift,
    /// Snowflake
    Snowflake,
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl WarehouseKind {
    /// All supported warehouse kinds, in display order
    pub const ALL: [WarehouseKind; 3] = [
        WarehouseKind::Redshift,
        WarehouseKind::Snowflake,
        WarehouseKind::DuckDb,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseKind::Redshift => "redshift",
            WarehouseKind::Snowflake => "snowflake",
            WarehouseKind::DuckDb => "duckdb",
        }
    }
}

impl fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarehouseKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        WarehouseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| CoreError::UnknownWarehouse {
                name: s.to_string(),
                supported: WarehouseKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!("redshift".parse::<WarehouseKind>().unwrap(), WarehouseKind::Redshift);
        assert_eq!("Snowflake".parse::<WarehouseKind>().unwrap(), WarehouseKind::Snowflake);
        assert_eq!(" duckdb ".parse::<WarehouseKind>().unwrap(), WarehouseKind::DuckDb);
    }

    #[test]
    fn test_parse_unknown_kind_is_typed_error() {
        let err = "oracle".parse::<WarehouseKind>().unwrap_err();
        match err {
            CoreError::UnknownWarehouse { name, supported } => {
                assert_eq!(name, "oracle");
                assert_eq!(supported, "redshift, snowflake, duckdb");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for kind in WarehouseKind::ALL {
            assert_eq!(kind.to_string().parse::<WarehouseKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let kind: WarehouseKind = serde_yaml::from_str("snowflake").unwrap();
        assert_eq!(kind, WarehouseKind::Snowflake);
    }
}

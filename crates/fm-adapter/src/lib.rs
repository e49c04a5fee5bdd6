//! fm-adapter - Warehouse adapters for Forma
//!
//! This crate turns compiled tables and assertions into ordered,
//! dialect-correct [`Tasks`](fm_core::Tasks) for Redshift, Snowflake and
//! DuckDB.

pub mod adapter;
pub mod duckdb;
pub mod redshift;
pub mod snowflake;

pub use adapter::{Adapter, TEMP_TABLE_SUFFIX};
pub use duckdb::DuckDbAdapter;
pub use redshift::RedshiftAdapter;
pub use snowflake::SnowflakeAdapter;

use fm_core::WarehouseKind;

/// Create the adapter for a warehouse kind
pub fn adapter_for(kind: WarehouseKind) -> Box<dyn Adapter> {
    match kind {
        WarehouseKind::Redshift => Box::new(RedshiftAdapter::new()),
        WarehouseKind::Snowflake => Box::new(SnowflakeAdapter::new()),
        WarehouseKind::DuckDb => Box::new(DuckDbAdapter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_for_every_kind() {
        for kind in WarehouseKind::ALL {
            assert_eq!(adapter_for(kind).kind(), kind);
        }
    }
}

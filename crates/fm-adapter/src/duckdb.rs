//! DuckDB adapter

use crate::adapter::{quoted_target, Adapter};
use fm_core::{Table, Target, WarehouseKind};

/// DuckDB SQL generation. No placement hints; table hints for other
/// dialects are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDbAdapter;

impl DuckDbAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for DuckDbAdapter {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::DuckDb
    }

    fn resolve_target(&self, target: &Target) -> String {
        quoted_target(target)
    }

    fn create_table(&self, table: &Table, target: &Target) -> String {
        format!(
            "create table {} as {}",
            self.resolve_target(target),
            table.query
        )
    }
}

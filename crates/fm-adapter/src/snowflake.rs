//! Snowflake adapter

use crate::adapter::{quoted_target, Adapter};
use fm_core::{Table, Target, WarehouseKind};

/// Snowflake SQL generation.
///
/// Tables accept clustering keys. `alter table ... rename to` resolves an
/// unqualified name against the session schema, so renames are fully
/// qualified.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeAdapter;

impl SnowflakeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for SnowflakeAdapter {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::Snowflake
    }

    fn resolve_target(&self, target: &Target) -> String {
        quoted_target(target)
    }

    fn create_table(&self, table: &Table, target: &Target) -> String {
        let cluster_by = table
            .snowflake
            .as_ref()
            .map(|options| options.cluster_by.as_slice())
            .filter(|keys| !keys.is_empty());

        match cluster_by {
            Some(keys) => format!(
                "create table {} cluster by ({}) as {}",
                self.resolve_target(target),
                keys.join(", "),
                table.query
            ),
            None => format!(
                "create table {} as {}",
                self.resolve_target(target),
                table.query
            ),
        }
    }

    fn rename_table(&self, from: &Target, to: &Target) -> String {
        format!(
            "alter table {} rename to {}",
            self.resolve_target(from),
            self.resolve_target(to)
        )
    }
}

#[cfg(test)]
#[path = "snowflake_test.rs"]
mod tests;

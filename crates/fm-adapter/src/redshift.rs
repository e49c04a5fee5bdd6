//! Amazon Redshift adapter

use crate::adapter::{quoted_target, Adapter};
use fm_core::{RedshiftOptions, Table, Target, WarehouseKind};

/// Redshift SQL generation.
///
/// Tables accept distribution and sort hints. Renames take an unqualified name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedshiftAdapter;

impl RedshiftAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Adapter for RedshiftAdapter {
    fn kind(&self) -> WarehouseKind {
        WarehouseKind::Redshift
    }

    fn resolve_target(&self, target: &Target) -> String {
        quoted_target(target)
    }

    fn create_table(&self, table: &Table, target: &Target) -> String {
        let mut sql = format!("create table {}", self.resolve_target(target));
        if let Some(options) = &table.redshift {
            push_placement_hints(&mut sql, options);
        }
        format!("{} as {}", sql, table.query)
    }
}

/// Append `diststyle`/`distkey` and `sortkey` clauses.
///
/// Each hint needs both of its halves; a half-specified hint is skipped.
fn push_placement_hints(sql: &mut String, options: &RedshiftOptions) {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

    if let (Some(style), Some(key)) = (non_empty(&options.dist_style), non_empty(&options.dist_key))
    {
        sql.push_str(&format!(" diststyle {} distkey ({})", style, key));
    }
    if let Some(style) = non_empty(&options.sort_style) {
        if !options.sort_keys.is_empty() {
            sql.push_str(&format!(
                " {} sortkey ({})",
                style,
                options.sort_keys.join(", ")
            ));
        }
    }
}

#[cfg(test)]
#[path = "redshift_test.rs"]
mod tests;

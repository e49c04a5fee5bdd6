//! The warehouse adapter abstraction.
//!
//! An [`Adapter`] turns a compiled [`Table`] or [`Assertion`] into the ordered
//! [`Tasks`] a warehouse must run. The decision logic (type changes,
//! incremental inserts, atomic replacement) is shared by every dialect through
//! the trait's provided methods; dialects supply identifier rendering, DDL
//! hints and the rename statement.
//!
//! Adapters do no I/O and cannot fail.

use fm_core::sql_utils::{quote_ident, quote_ident_list};
use fm_core::{
    Assertion, ObjectKind, ProjectConfig, RunConfig, Table, TableMetadata, TableType, Target,
    Task, Tasks, WarehouseKind,
};

/// Name suffix of the staging table used for atomic replacement
pub const TEMP_TABLE_SUFFIX: &str = "_temp";

/// Dialect-specific SQL plan generation
pub trait Adapter: Send + Sync {
    /// Warehouse this adapter targets
    fn kind(&self) -> WarehouseKind;

    /// Render a target as a quoted, fully-qualified identifier.
    ///
    /// Must be injective: distinct targets never render identically.
    fn resolve_target(&self, target: &Target) -> String;

    /// `create table <target> [hints] as <query>`
    fn create_table(&self, table: &Table, target: &Target) -> String;

    /// Rename the table at `from` so that it lives at `to` (same schema)
    fn rename_table(&self, from: &Target, to: &Target) -> String {
        format!(
            "alter table {} rename to {}",
            self.resolve_target(from),
            quote_ident(&to.name)
        )
    }

    /// `drop <kind> if exists <target> cascade`
    fn drop_if_exists(&self, target: &Target, kind: ObjectKind) -> String {
        format!(
            "drop {} if exists {} cascade",
            kind.as_sql(),
            self.resolve_target(target)
        )
    }

    /// `create or replace view <target> as <query>`
    fn create_or_replace_view(&self, target: &Target, query: &str) -> String {
        format!(
            "create or replace view {} as {}",
            self.resolve_target(target),
            query
        )
    }

    /// Insert the rows of `query` into the existing `columns` of `target`
    fn insert_into(&self, target: &Target, columns: &[&str], query: &str) -> String {
        let columns = quote_ident_list(columns);
        format!(
            "insert into {} ({}) select {} from ({}) as insertions",
            self.resolve_target(target),
            columns,
            columns,
            query
        )
    }

    /// Wrap `query` in a filter when a where clause is set
    fn where_filter(&self, query: &str, where_clause: Option<&str>) -> String {
        match where_clause.map(str::trim).filter(|w| !w.is_empty()) {
            Some(where_clause) => {
                format!("select * from ({}) as subquery where {}", query, where_clause)
            }
            None => query.to_string(),
        }
    }

    /// Staging target used while rebuilding `target`
    fn temp_target(&self, target: &Target) -> Target {
        target.with_name_suffix(TEMP_TABLE_SUFFIX)
    }

    /// Full rebuild of a table or view.
    ///
    /// Views: drop the view (column or type changes), then `create or replace
    /// view`. Tables: build `<name>_temp`, drop the live table, rename the temp
    /// table onto the live name. Any failure before the rename leaves the
    /// previous live table in place.
    fn create_or_replace(&self, table: &Table) -> Tasks {
        rebuild(self, table, true)
    }

    /// Plan publishing `table`, given what currently exists at its target
    fn publish_tasks(
        &self,
        table: &Table,
        run_config: &RunConfig,
        table_metadata: Option<&TableMetadata>,
    ) -> Tasks {
        let mut tasks = Tasks::new();
        let base_kind = table.table_type.base_kind();

        // The object changes kind: the old one must go before anything else runs.
        if let Some(metadata) = table_metadata {
            if metadata.kind != base_kind {
                tasks.add(Task::statement(
                    self.drop_if_exists(&table.target, base_kind.opposite()),
                ));
            }
        }

        if table.table_type != TableType::Incremental {
            tasks.add_all(rebuild(self, table, table_metadata.is_some()));
            return tasks;
        }

        match table_metadata {
            Some(metadata) if !run_config.full_refresh && metadata.kind == ObjectKind::Table => {
                let columns: Vec<&str> = metadata.field_names().collect();
                let query = self.where_filter(table.insert_query(), table.where_clause.as_deref());
                log::debug!(
                    "Incremental insert into {} ({} columns)",
                    table.target,
                    columns.len()
                );
                tasks.add(Task::statement(self.insert_into(
                    &table.target,
                    &columns,
                    &query,
                )));
            }
            _ => {
                tasks.add_all(rebuild(self, table, table_metadata.is_some()));
            }
        }
        tasks
    }

    /// Plan an assertion: a view over the query, then a row count over the view
    fn assert_tasks(&self, assertion: &Assertion, project_config: &ProjectConfig) -> Tasks {
        let target = assertion.resolved_target(project_config);
        let mut tasks = Tasks::new();
        tasks
            .add(Task::statement(
                self.create_or_replace_view(&target, &assertion.query),
            ))
            .add(Task::assertion(format!(
                "select sum(1) as row_count from {}",
                self.resolve_target(&target)
            )));
        tasks
    }
}

/// Shared full-rebuild plan.
///
/// `may_exist` is false only when the warehouse reported nothing at the
/// target, in which case the leading view drop is skipped.
fn rebuild<A: Adapter + ?Sized>(adapter: &A, table: &Table, may_exist: bool) -> Tasks {
    let mut tasks = Tasks::new();

    if table.table_type == TableType::View {
        if may_exist {
            tasks.add(Task::statement(
                adapter.drop_if_exists(&table.target, ObjectKind::View),
            ));
        }
        tasks.add(Task::statement(
            adapter.create_or_replace_view(&table.target, &table.query),
        ));
        return tasks;
    }

    let temp = adapter.temp_target(&table.target);
    tasks
        .add(Task::statement(
            adapter.drop_if_exists(&temp, ObjectKind::Table),
        ))
        .add(Task::statement(adapter.create_table(table, &temp)))
        .add(Task::statement(
            adapter.drop_if_exists(&table.target, ObjectKind::Table),
        ))
        .add(Task::statement(adapter.rename_table(&temp, &table.target)));
    tasks
}

/// `"schema"."name"` with embedded quotes doubled
pub fn quoted_target(target: &Target) -> String {
    format!("{}.{}", quote_ident(&target.schema), quote_ident(&target.name))
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;

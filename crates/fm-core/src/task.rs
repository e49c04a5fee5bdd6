//! Ordered execution plans.
//!
//! A [`Tasks`] value is the exact sequence of statements a warehouse must run.
//! Plans are built front to back; there is no way to remove or reorder a task.

use serde::{Deserialize, Serialize};

/// How the executor treats a task's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Result rows are discarded
    Statement,
    /// Result is a `row_count`; non-zero means the assertion failed
    Assertion,
}

/// One atomic execution step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub sql: String,
}

impl Task {
    /// A statement whose result is discarded
    pub fn statement(sql: impl Into<String>) -> Self {
        Self {
            kind: TaskKind::Statement,
            sql: sql.into(),
        }
    }

    /// A row-count check
    pub fn assertion(sql: impl Into<String>) -> Self {
        Self {
            kind: TaskKind::Assertion,
            sql: sql.into(),
        }
    }
}

/// Append-only, ordered sequence of [`Task`]s
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tasks(Vec<Task>);

impl Tasks {
    /// An empty plan
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one task
    pub fn add(&mut self, task: Task) -> &mut Self {
        self.0.push(task);
        self
    }

    /// Append every task of `other`, keeping its order
    pub fn add_all(&mut self, other: Tasks) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.0
    }

    /// SQL text of every task, in order
    pub fn sqls(&self) -> Vec<&str> {
        self.0.iter().map(|t| t.sql.as_str()).collect()
    }
}

impl IntoIterator for Tasks {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tasks {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Task> for Tasks {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;

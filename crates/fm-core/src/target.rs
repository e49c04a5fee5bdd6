//! Warehouse-addressable object identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A schema-qualified warehouse object (table or view).
///
/// `(schema, name)` is unique within a compiled graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target {
    /// Schema (dataset) holding the object
    pub schema: String,
    /// Object name within the schema
    pub name: String,
}

impl Target {
    /// Create a new target
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Return a sibling target in the same schema with `suffix` appended to the name.
    pub fn with_name_suffix(&self, suffix: &str) -> Self {
        Self {
            schema: self.schema.clone(),
            name: format!("{}{}", self.name, suffix),
        }
    }
}

/// Unquoted `schema.name`, for log lines and error messages only.
impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

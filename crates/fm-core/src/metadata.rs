//! Description of an object that already exists in the warehouse.

use crate::table::ObjectKind;
use crate::target::Target;
use serde::{Deserialize, Serialize};

/// A column of an existing warehouse object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Warehouse type name, when the connector reports one
    #[serde(default)]
    pub data_type: Option<String>,
}

impl Field {
    /// Create a field with no type information
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
        }
    }
}

/// Introspected state of the object currently living at a target.
///
/// Absence of metadata (`None`) means nothing exists at the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// The introspected object
    pub target: Target,
    /// Whether the existing object is a table or a view
    pub kind: ObjectKind,
    /// Existing columns, in warehouse ordinal order
    pub fields: Vec<Field>,
}

impl TableMetadata {
    /// Column names in their existing order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

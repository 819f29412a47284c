/// Schema descriptors produced by introspection

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primary key assumed when the catalog cannot tell us
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// The `{table, column}` a foreign-key column points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyTarget {
    pub table: String,
    pub column: String,
}

impl ForeignKeyTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Column name -> referenced target
pub type ForeignKeyMap = BTreeMap<String, ForeignKeyTarget>;

/// A table's structure as seen at call time
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub table: String,
    /// Column names in declared order
    pub columns: Vec<String>,
    pub primary_key: String,
    pub foreign_keys: ForeignKeyMap,
}

/// Schema Introspector and Relationship Inferrer
///
/// Reads the target database's own catalog at request time (never cached,
/// the external schema may change between requests) and derives foreign-key
/// relationships by naming convention when no formal constraints exist.

pub mod inference;
pub mod introspector;
pub mod types;

pub use types::{ForeignKeyMap, ForeignKeyTarget, TableSchema};

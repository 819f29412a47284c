/// Tablescope: browse any project's relational database without writing SQL
///
/// Each project carries its own connection descriptor. The engine connects on
/// demand, introspects tables, keys and relationships, and reads rows page by
/// page, all while keeping tenants isolated and driver errors out of responses.

// Core configuration and setup
pub mod config;

// Error taxonomy and connection-error sanitizing
pub mod error;

// Project descriptors, host storage, per-scope connection registry
pub mod project;

// Driver handles (MySQL/MariaDB and SQLite) behind one trait
pub mod connection;

// Schema introspection and relationship inference
pub mod schema;

// Cell values, page requests and the paginated reader
pub mod data;

// HTTP API layer - REST endpoints for projects and table browsing
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use config::{Config, ExplorerSettings};
pub use connection::DatabaseHandle;
pub use data::{CellValue, Page, PageRequest, Row, RowOrder};
pub use error::{sanitize, ExplorerError, IntrospectionError};
pub use project::{ConnectionRegistry, ConnectionStatus, Project, ProjectDatabase, RecordView};
pub use schema::{ForeignKeyMap, ForeignKeyTarget, TableSchema};
pub use server::start_server;

/// Project management module
///
/// Handles project descriptors, the host's own project storage, and isolated
/// per-project access to each tenant's external database.
/// Each project's handle is registered as `project_{id}` in a scope-owned registry.

pub mod registry;
pub mod service;
pub mod storage;
pub mod types;

pub use registry::ConnectionRegistry;
pub use service::{ConnectionStatus, ProjectDatabase, RecordView};
pub use storage::ProjectStorage;
pub use types::{DatabaseDriver, Project, ProjectSummary};

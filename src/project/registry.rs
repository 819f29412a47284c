/// Connection registry for isolated multi-tenant database access
///
/// Maps a project's connection name (`project_{id}`) to a live handle.
/// A registry is an ordinary value owned by one request/operation scope, not
/// process-wide state: handles are keyed by project id, so two projects can
/// never resolve to each other's credentials, even when pointed at the same host.

use crate::config::ExplorerSettings;
use crate::connection::{self, DatabaseHandle};
use crate::error::ExplorerError;
use crate::project::types::Project;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-scope registry of project database handles
///
/// LAZY LOADING: Handles are created on first access, pools connect on first statement
/// EXPLICIT PURGE: `disconnect` / `disconnect_all` close pooled connections
pub struct ConnectionRegistry {
    /// Live handles keyed by connection name
    handles: RwLock<HashMap<String, Arc<dyn DatabaseHandle>>>,
    /// Limits applied to every handle opened through this registry
    settings: ExplorerSettings,
}

impl ConnectionRegistry {
    pub fn new(settings: ExplorerSettings) -> Self {
        Self {
            handles: RwLock::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    /// Get or create the handle for `project`
    ///
    /// Returns `Ok(None)` when the project has no complete descriptor; that is
    /// the normal "no database configured" state, not a failure. Calling again
    /// returns the same handle for as long as this registry lives.
    pub async fn connect(
        &self,
        project: &Project,
    ) -> Result<Option<Arc<dyn DatabaseHandle>>, ExplorerError> {
        if !project.has_database() {
            tracing::debug!("Project {} has no database configured", project.id);
            return Ok(None);
        }

        let name = project.connection_name();

        // Try read lock first (fast path for existing handles)
        {
            let handles = self.handles.read().await;
            if let Some(handle) = handles.get(&name) {
                return Ok(Some(Arc::clone(handle)));
            }
        }

        let mut handles = self.handles.write().await;

        // Double-check pattern (another task might have registered it)
        if let Some(handle) = handles.get(&name) {
            return Ok(Some(Arc::clone(handle)));
        }

        let handle = connection::open(project, &self.settings)?;
        tracing::info!(
            "🔌 Registered connection {} ({})",
            name,
            handle.driver()
        );
        handles.insert(name, Arc::clone(&handle));

        Ok(Some(handle))
    }

    /// Release the project's handle; a no-op when none was opened
    pub async fn disconnect(&self, project: &Project) {
        let removed = self
            .handles
            .write()
            .await
            .remove(&project.connection_name());

        if let Some(handle) = removed {
            handle.close().await;
            tracing::info!("🔒 Purged connection {}", handle.connection_name());
        }
    }

    /// Release every handle opened through this registry
    pub async fn disconnect_all(&self) {
        let drained: Vec<_> = self.handles.write().await.drain().collect();
        for (name, handle) in drained {
            handle.close().await;
            tracing::debug!("🔒 Purged connection {}", name);
        }
    }

    /// Number of live handles (monitoring and tests)
    pub async fn open_count(&self) -> usize {
        self.handles.read().await.len()
    }
}

/// HTTP API Layer
///
/// Thin REST surface over project database browsing. It handles:
/// - Project registration (descriptor storage only)
/// - Connection tests
/// - Table listing, table pages, and single records with foreign-key links
/// - The users and feedback convenience views

// Project registration endpoints (GET/PUT/DELETE)
pub mod projects;

// Table browsing endpoints
pub mod tables;

use crate::config::ExplorerSettings;
use crate::error::ExplorerError;
use crate::project::{ProjectDatabase, ProjectStorage};
use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

pub use projects::create_project_routes;
pub use tables::create_table_routes;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Host storage for project descriptors
    pub storage: ProjectStorage,
    /// Limits applied to every per-request project connection
    pub settings: ExplorerSettings,
}

/// Error response: status plus `{"error": "..."}`
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Map an engine failure to a response carrying only its sanitized message
pub(crate) fn engine_error(err: ExplorerError) -> ApiError {
    tracing::warn!("⚠️ Project database operation failed: {}", err);
    let status = match err {
        ExplorerError::InvalidPage(_) => StatusCode::BAD_REQUEST,
        ExplorerError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };
    error_response(status, err.public_message())
}

/// Open a request-scoped database for a stored project
pub(crate) async fn open_project(state: &AppState, id: &str) -> Result<ProjectDatabase, ApiError> {
    match state.storage.get_project(id).await {
        Ok(Some(project)) => Ok(ProjectDatabase::new(project, state.settings.clone())),
        Ok(None) => Err(error_response(StatusCode::NOT_FOUND, "Project not found")),
        Err(e) => {
            tracing::error!("Failed to load project {}: {}", id, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load project"))
        }
    }
}

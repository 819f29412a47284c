/// Project registration REST API endpoints
///
/// Stores and reads project descriptors. Responses never include credentials.

use crate::api::{open_project, ApiError, AppState};
use crate::project::{ConnectionStatus, Project, ProjectSummary};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};

/// Create project routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route(
            "/api/projects/{id}",
            get(get_project).put(save_project).delete(delete_project),
        )
        .route("/api/projects/{id}/connection", get(test_connection))
}

/// List all projects
///
/// GET /api/projects
/// Returns: { "projects": [{ "id": "...", "name": "...", "has_database": true, ... }] }
async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.storage.list_projects().await {
        Ok(projects) => {
            let summaries: Vec<ProjectSummary> = projects.iter().map(Project::summary).collect();
            Ok(Json(json!({ "projects": summaries })))
        }
        Err(e) => {
            tracing::error!("Failed to list projects: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a project by ID
///
/// GET /api/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectSummary>, StatusCode> {
    match state.storage.get_project(&id).await {
        Ok(Some(project)) => Ok(Json(project.summary())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get project {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Register or update a project
///
/// PUT /api/projects/{id}
/// Body: { "name": "...", "db_driver": "mysql", "db_host": "...", ... }
async fn save_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut project): Json<Project>,
) -> Result<Json<ProjectSummary>, StatusCode> {
    // The URL is authoritative for the ID
    project.id = id;

    if project.id.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    if let Err(e) = state.storage.save_project(&project).await {
        tracing::error!("Failed to save project {}: {}", project.id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("💾 Saved project: {} ({})", project.id, project.name);

    Ok(Json(project.summary()))
}

/// Delete a project
///
/// DELETE /api/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.storage.delete_project(&id).await {
        Ok(true) => {
            tracing::info!("Deleted project: {}", id);
            Ok(Json(json!({ "message": "Project deleted successfully" })))
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete project: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Test the project's database connection
///
/// GET /api/projects/{id}/connection
/// Returns: { "connected": false, "error": "Access denied - check username and password" }
async fn test_connection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let db = open_project(&state, &id).await?;
    let status = db.test_connection().await;
    db.close().await;
    Ok(Json(status))
}

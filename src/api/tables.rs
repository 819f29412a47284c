/// Table browsing REST API endpoints
///
/// Every handler opens its own project scope and closes it before
/// responding, so no tenant connection outlives the request.

use crate::api::{engine_error, error_response, open_project, ApiError, AppState};
use crate::config::ExplorerSettings;
use crate::data::{Page, PageRequest};
use crate::project::service::pinned_among;
use crate::project::{ProjectDatabase, RecordView};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Pagination query parameters (`?page=2&per_page=15`)
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageParams {
    /// Caller-side bounding: the reader itself never caps page sizes
    fn to_request(&self, settings: &ExplorerSettings) -> Result<PageRequest, ApiError> {
        let page_size = settings.clamp_page_size(self.per_page);
        PageRequest::new(page_size, self.page.unwrap_or(1)).map_err(engine_error)
    }
}

/// Create table browsing routes
pub fn create_table_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects/{id}/tables", get(list_tables))
        .route("/api/projects/{id}/tables/{table}", get(show_table))
        .route(
            "/api/projects/{id}/tables/{table}/records/{record_id}",
            get(show_record),
        )
        .route("/api/projects/{id}/users", get(list_users))
        .route("/api/projects/{id}/feedback", get(list_feedback))
}

/// List tables of the project's database
///
/// GET /api/projects/{id}/tables
/// Returns: { "has_database": true, "tables": [...], "pinned": [...] }
async fn list_tables(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = open_project(&state, &id).await?;
    let result = db.tables().await;
    let has_database = db.has_database();
    let pinned = result
        .as_ref()
        .map(|tables| pinned_among(&db.project().pinned_tables, tables))
        .unwrap_or_default();
    db.close().await;

    let tables = result.map_err(engine_error)?;
    Ok(Json(json!({
        "has_database": has_database,
        "tables": tables,
        "pinned": pinned,
    })))
}

/// Show one page of a table with its schema
///
/// GET /api/projects/{id}/tables/{table}?page=1&per_page=15
async fn show_table(
    State(state): State<AppState>,
    Path((id, table)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let request = params.to_request(&state.settings)?;
    let db = open_project(&state, &id).await?;
    let result = table_view(&db, &table, request).await;
    db.close().await;
    result.map(Json)
}

async fn table_view(db: &ProjectDatabase, table: &str, request: PageRequest) -> Result<Value, ApiError> {
    if !db.has_database() {
        return Ok(json!({
            "has_database": false,
            "table": table,
            "schema": null,
            "page": Page::empty(request),
        }));
    }

    ensure_table(db, table).await?;
    let schema = db.table_schema(table).await.map_err(engine_error)?;
    let page = db.table_page(table, request).await.map_err(engine_error)?;

    Ok(json!({
        "has_database": true,
        "table": table,
        "schema": schema,
        "page": page,
    }))
}

/// Show a single record with resolved foreign-key links
///
/// GET /api/projects/{id}/tables/{table}/records/{record_id}
async fn show_record(
    State(state): State<AppState>,
    Path((id, table, record_id)): Path<(String, String, String)>,
) -> Result<Json<RecordView>, ApiError> {
    let db = open_project(&state, &id).await?;
    let result = record_view(&db, &table, &record_id).await;
    db.close().await;
    result.map(Json)
}

async fn record_view(db: &ProjectDatabase, table: &str, record_id: &str) -> Result<RecordView, ApiError> {
    ensure_table(db, table).await?;
    db.record(table, record_id)
        .await
        .map_err(engine_error)?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Record not found"))
}

/// Users view, newest first
///
/// GET /api/projects/{id}/users?page=1
async fn list_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let request = params.to_request(&state.settings)?;
    let db = open_project(&state, &id).await?;
    let table = db.project().users_table_name().to_string();
    let result = db.users_page(request).await;
    db.close().await;

    let page = result.map_err(engine_error)?;
    Ok(Json(json!({ "table": table, "page": page })))
}

/// Feedback view, newest first; empty unless the project names a table
///
/// GET /api/projects/{id}/feedback?page=1
async fn list_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let request = params.to_request(&state.settings)?;
    let db = open_project(&state, &id).await?;
    let table = db.project().feedbacks_table_name().map(str::to_string);
    let result = db.feedbacks_page(request).await;
    db.close().await;

    let page = result.map_err(engine_error)?;
    Ok(Json(json!({ "table": table, "page": page })))
}

/// 404 unless `table` exists in the live table list
async fn ensure_table(db: &ProjectDatabase, table: &str) -> Result<(), ApiError> {
    if db.has_table(table).await.map_err(engine_error)? {
        Ok(())
    } else {
        Err(error_response(StatusCode::NOT_FOUND, "Table not found"))
    }
}

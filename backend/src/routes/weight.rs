//! Weight entry API routes

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::WeightService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;
use weight_tracker_shared::models::WeightEntry;
use weight_tracker_shared::types::{CreateEntryRequest, EntryPage, EntryPageQuery, MessageResponse};

/// Create weight routes
pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/all", get(list_all_entries))
        .route("/:id", delete(delete_entry))
}

/// GET /api/v1/weight - One page of history, newest first
///
/// Supports pagination with page (default: 1) and limit (default: 20, max: 100).
async fn list_entries(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<EntryPageQuery>,
) -> Result<Json<EntryPage>, ApiError> {
    let page = WeightService::list_page(state.db(), user.user_id, &query, &state.config().pagination).await?;
    Ok(Json(page))
}

/// GET /api/v1/weight/all - Every entry, oldest first
async fn list_all_entries(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<WeightEntry>>, ApiError> {
    let entries = WeightService::list_all(state.db(), user.user_id).await?;
    Ok(Json(entries))
}

/// POST /api/v1/weight - Create an entry, replacing one on the same date
async fn create_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<WeightEntry>), ApiError> {
    let entry = WeightService::create_entry(state.db(), user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/weight/:id - Delete an entry owned by the user
async fn delete_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    WeightService::delete_entry(state.db(), user.user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Weight entry deleted".to_string(),
    }))
}

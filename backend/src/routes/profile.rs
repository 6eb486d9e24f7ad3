//! Profile and avatar API routes

use crate::auth::CurrentUser;
use crate::config::UploadConfig;
use crate::error::ApiError;
use crate::services::{AvatarService, AvatarUpload, ProfileService};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use weight_tracker_shared::models::Profile;
use weight_tracker_shared::types::{AvatarResponse, SaveProfileRequest};

/// Multipart framing allowance on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create profile routes
pub fn profile_routes(uploads: &UploadConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(save_profile))
        .route(
            "/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(uploads.max_bytes + MULTIPART_OVERHEAD_BYTES)),
        )
}

/// GET /api/v1/profile - Get the user's profile
async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = ProfileService::get(state.db(), user.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - Replace the user's profile
async fn save_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SaveProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let today = Utc::now().date_naive();
    let profile = ProfileService::save(state.db(), user.user_id, req, today).await?;
    Ok(Json(profile))
}

/// POST /api/v1/profile/avatar - Upload an avatar (multipart field `avatar`)
async fn upload_avatar(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("avatar") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some(AvatarUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::BadRequest("Please upload a file".to_string()))?;

    let response = AvatarService::store(
        state.db(),
        &state.config().uploads,
        user.user_id,
        &user.username,
        upload,
    )
    .await?;

    Ok(Json(response))
}

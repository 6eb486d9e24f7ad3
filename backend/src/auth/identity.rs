//! Reverse-proxy identity
//!
//! The proxy in front of the server authenticates the user and forwards
//! the user name in a header. The first request of an unknown name
//! creates the user together with an empty profile.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::observability::USERS_CREATED;
use crate::repositories::UserRepository;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{request::Parts, HeaderMap},
};
use tracing::info;
use uuid::Uuid;

const MAX_USERNAME_LEN: usize = 64;

/// User resolved from the identity header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Resolve the user name from request headers
///
/// Falls back to the configured default user when the header is absent
/// or blank.
pub fn resolve_username(headers: &HeaderMap, config: &AuthConfig) -> Result<String, ApiError> {
    let from_header = headers
        .get(config.user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let username = match from_header {
        Some(name) => name.to_string(),
        None => config
            .default_user
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing user identity".to_string()))?,
    };

    validate_username(&username)?;
    Ok(username)
}

/// User names end up in avatar file names, so only a safe alphabet is accepted
fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid = username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@'))
        && !username.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Invalid user identity".to_string()))
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let username = resolve_username(&parts.headers, &app_state.config().auth)?;

        let user = UserRepository::find_or_create(app_state.db(), &username)
            .await
            .map_err(ApiError::Internal)?;

        if user.created {
            info!(username = %user.username, "Created new user");
            metrics::counter!(USERS_CREATED).increment(1);
        }

        Ok(CurrentUser {
            user_id: user.id,
            username: user.username,
        })
    }
}

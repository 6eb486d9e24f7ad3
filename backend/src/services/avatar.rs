//! Avatar upload service
//!
//! Stores uploaded images under `<uploads dir>/avatars` and points the
//! profile at the public `/uploads/avatars/...` URL.

use crate::config::UploadConfig;
use crate::error::ApiError;
use crate::observability::AVATARS_UPLOADED;
use crate::repositories::ProfileRepository;
use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;
use std::path::Path;
use tracing::info;
use uuid::Uuid;
use weight_tracker_shared::types::AvatarResponse;
use weight_tracker_shared::validation::validate_avatar_file;

const AVATAR_SUBDIR: &str = "avatars";

/// An uploaded avatar image
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Avatar service for business logic
pub struct AvatarService;

impl AvatarService {
    /// Validate, store and link an uploaded avatar
    pub async fn store(
        pool: &PgPool,
        config: &UploadConfig,
        user_id: Uuid,
        username: &str,
        upload: AvatarUpload,
    ) -> Result<AvatarResponse, ApiError> {
        if upload.bytes.len() > config.max_bytes {
            return Err(ApiError::PayloadTooLarge("Avatar file is too large".to_string()));
        }
        validate_avatar_file(&upload.file_name, &upload.content_type, upload.bytes.len()).map_err(
            |message| ApiError::InvalidField {
                field: "avatar".to_string(),
                message,
            },
        )?;

        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let stored_name = stored_file_name(
            username,
            &upload.file_name,
            &upload.content_type,
            Utc::now().timestamp_millis(),
            suffix,
        );

        let dir = config.dir.join(AVATAR_SUBDIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        tokio::fs::write(dir.join(&stored_name), &upload.bytes)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let avatar_url = format!("/uploads/{}/{}", AVATAR_SUBDIR, stored_name);
        ProfileRepository::set_avatar(pool, user_id, &avatar_url)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, avatar_url = %avatar_url, "Avatar uploaded");
        metrics::counter!(AVATARS_UPLOADED).increment(1);

        Ok(AvatarResponse { avatar_url })
    }
}

/// `<username>-<millis>-<suffix>.<ext>`, keeping the original extension
fn stored_file_name(username: &str, original: &str, content_type: &str, millis: i64, suffix: u32) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .or_else(|| (content_type == "image/svg+xml").then(|| "svg".to_string()));

    match extension {
        Some(ext) => format!("{}-{}-{}.{}", username, millis, suffix, ext),
        None => format!("{}-{}-{}", username, millis, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_extension() {
        assert_eq!(
            stored_file_name("igrik82", "Me.PNG", "image/png", 1700000000000, 42),
            "igrik82-1700000000000-42.png"
        );
    }

    #[test]
    fn test_svg_without_extension() {
        assert_eq!(
            stored_file_name("bob", "drawing", "image/svg+xml", 1, 2),
            "bob-1-2.svg"
        );
    }

    #[test]
    fn test_odd_extension_dropped() {
        assert_eq!(stored_file_name("bob", "x.p/ng", "image/png", 1, 2), "bob-1-2");
    }
}

//! Profile service
//!
//! Reads and replaces the per-user profile, including the clothes-weight
//! settings.

use crate::error::ApiError;
use crate::observability::PROFILES_SAVED;
use crate::repositories::ProfileRepository;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;
use weight_tracker_shared::models::Profile;
use weight_tracker_shared::types::SaveProfileRequest;
use weight_tracker_shared::validation::validate_birth_date;

/// Profile service for business logic
pub struct ProfileService;

impl ProfileService {
    /// Get the profile of a user
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Profile, ApiError> {
        let record = ProfileRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record.map(|r| r.into_profile()).unwrap_or_default())
    }

    /// Replace the profile with the submitted form
    pub async fn save(
        pool: &PgPool,
        user_id: Uuid,
        req: SaveProfileRequest,
        today: NaiveDate,
    ) -> Result<Profile, ApiError> {
        let profile = Self::validate_request(req, today)?;

        let record = ProfileRepository::save(pool, user_id, &profile)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, "Profile saved");
        metrics::counter!(PROFILES_SAVED).increment(1);

        Ok(record.into_profile())
    }

    /// Validate a profile form into a profile
    ///
    /// The avatar is not part of the form and keeps its default here.
    pub fn validate_request(req: SaveProfileRequest, today: NaiveDate) -> Result<Profile, ApiError> {
        req.validate()?;

        if let Some(birth_date) = req.birth_date {
            validate_birth_date(birth_date, today).map_err(|message| ApiError::InvalidField {
                field: "birth_date".to_string(),
                message,
            })?;
        }

        Ok(Profile {
            gender: req.gender,
            height_cm: req.height_cm,
            birth_date: req.birth_date,
            muscle_category: req.muscle_category,
            target_weight_kg: req.target_weight_kg,
            clothes_weight_kg: req.clothes_weight_kg,
            ignore_clothes_weight: req.ignore_clothes_weight,
            ..Profile::default()
        })
    }
}

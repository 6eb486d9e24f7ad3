//! API request and response types

use crate::models::{Gender, MuscleCategory, Profile, WeightEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default history page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of entries, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPage {
    pub entries: Vec<WeightEntry>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl EntryPage {
    pub fn total_pages_for(total: u64, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        total.div_ceil(u64::from(page_size)) as u32
    }
}

/// Pagination query for the history list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl EntryPageQuery {
    /// Apply defaults and bounds: page starts at 1, limit within 1..=max
    pub fn normalize(&self, default_limit: u32, max_limit: u32) -> (u32, u32) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(max_limit);
        (page, limit)
    }
}

/// Create an entry (weight already adjusted for clothes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateEntryRequest {
    pub date: NaiveDate,
    #[validate(range(exclusive_min = 0.0, max = 500.0, message = "Weight must be between 0 and 500 kg"))]
    pub weight: f64,
    #[serde(default)]
    pub clothes_applied: bool,
}

/// Profile form and settings form submission
///
/// The whole profile is replaced on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SaveProfileRequest {
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub muscle_category: Option<MuscleCategory>,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, max = 500.0, message = "Target weight must be between 0 and 500 kg"))]
    pub target_weight_kg: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 20.0, message = "Clothes weight must be between 0 and 20 kg"))]
    pub clothes_weight_kg: f64,
    #[serde(default)]
    pub ignore_clothes_weight: bool,
}

impl From<&Profile> for SaveProfileRequest {
    fn from(profile: &Profile) -> Self {
        Self {
            gender: profile.gender,
            height_cm: profile.height_cm,
            birth_date: profile.birth_date,
            muscle_category: profile.muscle_category,
            target_weight_kg: profile.target_weight_kg,
            clothes_weight_kg: profile.clothes_weight_kg,
            ignore_clothes_weight: profile.ignore_clothes_weight,
        }
    }
}

/// Avatar upload result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

//! Server-side dashboard derivation
//!
//! Loads a user's entries and profile and runs them through the shared
//! derivation engine, so non-browser consumers get the same view.

use crate::error::ApiError;
use crate::services::{ProfileService, WeightService};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;
use weight_tracker_shared::dashboard::{derive_view, DerivedView};
use weight_tracker_shared::models::sort_descending;
use weight_tracker_shared::period::PeriodSelector;

/// Dashboard service
pub struct DashboardService;

impl DashboardService {
    /// Derive the full view for `period` as of `today`
    ///
    /// The history lists every entry rather than a single page.
    pub async fn build(
        pool: &PgPool,
        user_id: Uuid,
        period: PeriodSelector,
        today: NaiveDate,
    ) -> Result<DerivedView, ApiError> {
        let (entries, profile) = tokio::try_join!(
            WeightService::list_all(pool, user_id),
            ProfileService::get(pool, user_id),
        )?;

        let mut history = entries.clone();
        sort_descending(&mut history);

        Ok(derive_view(&entries, &history, &profile, &period, today))
    }
}

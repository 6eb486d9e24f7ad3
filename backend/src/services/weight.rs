//! Weight entry service
//!
//! Provides business logic for weight tracking:
//! - Entry creation with same-day replacement
//! - Paginated history and the full chart data set
//! - Ownership-checked deletion

use crate::config::PaginationConfig;
use crate::error::ApiError;
use crate::observability::{ENTRIES_DELETED, ENTRIES_SAVED};
use crate::repositories::{CreateWeightEntry, WeightRepository};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;
use weight_tracker_shared::models::WeightEntry;
use weight_tracker_shared::types::{CreateEntryRequest, EntryPage, EntryPageQuery};

/// Weight service for business logic
pub struct WeightService;

impl WeightService {
    /// Store an entry
    ///
    /// The weight arrives already adjusted for clothes; an existing entry on
    /// the same date is replaced.
    pub async fn create_entry(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateEntryRequest,
    ) -> Result<WeightEntry, ApiError> {
        req.validate()?;

        let record = WeightRepository::upsert(
            pool,
            CreateWeightEntry {
                user_id,
                date: req.date,
                weight_kg: req.weight,
                clothes_applied: req.clothes_applied,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(entry_id = %record.id, date = %record.entry_date, "Weight entry saved");
        metrics::counter!(ENTRIES_SAVED).increment(1);

        Ok(record.into())
    }

    /// Get one page of history, newest first
    pub async fn list_page(
        pool: &PgPool,
        user_id: Uuid,
        query: &EntryPageQuery,
        pagination: &PaginationConfig,
    ) -> Result<EntryPage, ApiError> {
        let (page, limit) = query.normalize(pagination.default_limit, pagination.max_limit);
        let offset = i64::from(page - 1) * i64::from(limit);

        let records = WeightRepository::list_page(pool, user_id, i64::from(limit), offset)
            .await
            .map_err(ApiError::Internal)?;
        let total = WeightRepository::count(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .max(0) as u64;

        Ok(EntryPage {
            entries: records.into_iter().map(WeightEntry::from).collect(),
            total,
            page,
            total_pages: EntryPage::total_pages_for(total, limit),
        })
    }

    /// Get every entry, oldest first
    pub async fn list_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeightEntry>, ApiError> {
        let records = WeightRepository::list_all(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(WeightEntry::from).collect())
    }

    /// Delete an entry owned by the user
    pub async fn delete_entry(pool: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), ApiError> {
        let deleted = WeightRepository::delete(pool, entry_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Weight entry not found".to_string()));
        }

        info!(entry_id = %entry_id, "Weight entry deleted");
        metrics::counter!(ENTRIES_DELETED).increment(1);
        Ok(())
    }
}

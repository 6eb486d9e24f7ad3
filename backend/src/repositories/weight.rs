//! Weight entry repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use weight_tracker_shared::models::WeightEntry;

/// Weight entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub weight_kg: Decimal,
    pub clothes_applied: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WeightEntryRecord> for WeightEntry {
    fn from(record: WeightEntryRecord) -> Self {
        WeightEntry {
            id: record.id,
            date: record.entry_date,
            weight: record.weight_kg.to_f64().unwrap_or(0.0),
            clothes_applied: record.clothes_applied,
        }
    }
}

/// Input for creating a weight entry
#[derive(Debug, Clone)]
pub struct CreateWeightEntry {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub clothes_applied: bool,
}

fn weight_decimal(weight_kg: f64) -> Result<Decimal> {
    Decimal::from_f64(weight_kg)
        .map(|d| d.round_dp(2))
        .with_context(|| format!("weight {} cannot be stored", weight_kg))
}

/// Weight repository for database operations
pub struct WeightRepository;

impl WeightRepository {
    /// Create an entry, replacing the weight of an existing entry on the same day
    pub async fn upsert(pool: &PgPool, input: CreateWeightEntry) -> Result<WeightEntryRecord> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            INSERT INTO weight_entries (user_id, entry_date, weight_kg, clothes_applied)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, entry_date) DO UPDATE SET
                weight_kg = EXCLUDED.weight_kg,
                clothes_applied = EXCLUDED.clothes_applied
            RETURNING id, user_id, entry_date, weight_kg, clothes_applied, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.date)
        .bind(weight_decimal(input.weight_kg)?)
        .bind(input.clothes_applied)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get one page of entries, newest first
    pub async fn list_page(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WeightEntryRecord>> {
        let records = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            SELECT id, user_id, entry_date, weight_kg, clothes_applied, created_at
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY entry_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Count the entries of a user
    pub async fn count(pool: &PgPool, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM weight_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Get every entry of a user, oldest first
    pub async fn list_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeightEntryRecord>> {
        let records = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            SELECT id, user_id, entry_date, weight_kg, clothes_applied, created_at
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY entry_date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Delete an entry owned by the user
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM weight_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace all entries of a user in one transaction
    ///
    /// Returns the number of entries inserted. Duplicate dates in `entries`
    /// collapse to the last one.
    pub async fn replace_all(pool: &PgPool, user_id: Uuid, entries: &[WeightEntry]) -> Result<u64> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM weight_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        for entry in entries {
            let result = sqlx::query(
                r#"
                INSERT INTO weight_entries (user_id, entry_date, weight_kg, clothes_applied)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, entry_date) DO UPDATE SET
                    weight_kg = EXCLUDED.weight_kg,
                    clothes_applied = EXCLUDED.clothes_applied
                "#,
            )
            .bind(user_id)
            .bind(entry.date)
            .bind(weight_decimal(entry.weight)?)
            .bind(entry.clothes_applied)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }
}

//! User and profile repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;
use weight_tracker_shared::models::Profile;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    /// Whether this call inserted the row
    pub created: bool,
}

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub gender: Option<String>,
    pub height_cm: Option<Decimal>,
    pub birth_date: Option<NaiveDate>,
    pub muscle_category: Option<String>,
    pub target_weight_kg: Option<Decimal>,
    pub clothes_weight_kg: Decimal,
    pub ignore_clothes_weight: bool,
    pub avatar_url: String,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Convert to the shared profile model
    ///
    /// Enum columns holding unknown values are read as unset.
    pub fn into_profile(self) -> Profile {
        Profile {
            gender: self.gender.as_deref().and_then(|g| g.parse().ok()),
            height_cm: self.height_cm.and_then(|d| d.to_f64()),
            birth_date: self.birth_date,
            muscle_category: self.muscle_category.as_deref().and_then(|m| m.parse().ok()),
            target_weight_kg: self.target_weight_kg.and_then(|d| d.to_f64()),
            clothes_weight_kg: self.clothes_weight_kg.to_f64().unwrap_or(0.0),
            ignore_clothes_weight: self.ignore_clothes_weight,
            avatar_url: self.avatar_url,
        }
    }
}

const PROFILE_COLUMNS: &str = "user_id, gender, height_cm, birth_date, muscle_category, \
    target_weight_kg, clothes_weight_kg, ignore_clothes_weight, avatar_url, updated_at";

fn to_decimal(value: f64) -> Option<Decimal> {
    let decimal = Decimal::from_f64(value);
    if decimal.is_none() {
        warn!(value, "Value cannot be stored as a decimal");
    }
    decimal
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Find a user by name, creating the user and an empty profile if needed
    pub async fn find_or_create(pool: &PgPool, username: &str) -> Result<UserRecord> {
        let mut tx = pool.begin().await?;

        // xmax is zero only for rows inserted by this statement
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
            RETURNING id, username, created_at, (xmax = 0) AS created
            "#,
        )
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }
}

/// Profile repository for database operations
pub struct ProfileRepository;

impl ProfileRepository {
    /// Get the profile of a user
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Replace every editable profile field
    ///
    /// The avatar is managed separately and left untouched.
    pub async fn save(pool: &PgPool, user_id: Uuid, profile: &Profile) -> Result<ProfileRecord> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO profiles (user_id, gender, height_cm, birth_date, muscle_category,
                                  target_weight_kg, clothes_weight_kg, ignore_clothes_weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                gender = EXCLUDED.gender,
                height_cm = EXCLUDED.height_cm,
                birth_date = EXCLUDED.birth_date,
                muscle_category = EXCLUDED.muscle_category,
                target_weight_kg = EXCLUDED.target_weight_kg,
                clothes_weight_kg = EXCLUDED.clothes_weight_kg,
                ignore_clothes_weight = EXCLUDED.ignore_clothes_weight,
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(profile.gender.map(|g| g.as_str()))
        .bind(profile.height_cm.and_then(to_decimal))
        .bind(profile.birth_date)
        .bind(profile.muscle_category.map(|m| m.as_str()))
        .bind(profile.target_weight_kg.and_then(to_decimal))
        .bind(to_decimal(profile.clothes_weight_kg).unwrap_or_default())
        .bind(profile.ignore_clothes_weight)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Point the profile at a newly uploaded avatar
    pub async fn set_avatar(pool: &PgPool, user_id: Uuid, avatar_url: &str) -> Result<ProfileRecord> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            UPDATE profiles
            SET avatar_url = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(avatar_url)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}

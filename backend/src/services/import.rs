//! Bulk import of a user's weight history from a JSON file
//!
//! The file is an array of `{ "date", "weight", "clothesApplied"? }`
//! records. Dates may carry a time part, which is ignored.

use crate::repositories::{UserRepository, WeightRepository};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use weight_tracker_shared::models::WeightEntry;
use weight_tracker_shared::validation::validate_weight;

#[derive(Debug, Deserialize)]
struct ImportRecord {
    date: String,
    weight: f64,
    #[serde(default, alias = "clothesApplied")]
    clothes_applied: bool,
}

/// Outcome of an import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub username: String,
    pub created_user: bool,
    pub imported: u64,
    pub skipped: usize,
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse an import file
///
/// Fails when the file is not a JSON array; records with an unreadable
/// date or an invalid weight are skipped. Returns the entries and the
/// number of skipped records.
pub fn parse_import_file(json: &str) -> Result<(Vec<WeightEntry>, usize)> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).context("import file must be a JSON array")?;

    let total = records.len();
    let entries: Vec<WeightEntry> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record: ImportRecord = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable record");
                    return None;
                }
            };
            let Some(date) = parse_record_date(&record.date) else {
                warn!(index, date = %record.date, "Skipping record with invalid date");
                return None;
            };
            if let Err(e) = validate_weight(record.weight) {
                warn!(index, error = %e, "Skipping record with invalid weight");
                return None;
            }
            Some(WeightEntry {
                clothes_applied: record.clothes_applied,
                ..WeightEntry::new(date, record.weight)
            })
        })
        .collect();

    let skipped = total - entries.len();
    Ok((entries, skipped))
}

/// Import service
pub struct ImportService;

impl ImportService {
    /// Replace a user's entries with the contents of an import file
    ///
    /// The user is created when missing.
    pub async fn run(pool: &PgPool, username: &str, json: &str) -> Result<ImportSummary> {
        let (entries, skipped) = parse_import_file(json)?;

        let user = UserRepository::find_or_create(pool, username).await?;
        if user.created {
            info!(username, "User not found, created");
        }

        info!(username, count = entries.len(), "Replacing weight entries");
        let imported = WeightRepository::replace_all(pool, user.id, &entries).await?;

        Ok(ImportSummary {
            username: user.username,
            created_user: user.created,
            imported,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_file() {
        let json = r#"[
            {"date": "2024-01-05T00:00:00.000Z", "weight": 92.4},
            {"date": "2024-01-12", "weight": 91.8, "clothesApplied": true},
            {"date": "someday", "weight": 91.0},
            {"date": "2024-01-19", "weight": 0},
            {"weight": 90.0}
        ]"#;

        let (entries, skipped) = parse_import_file(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(skipped, 3);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert!(!entries[0].clothes_applied);
        assert!(entries[1].clothes_applied);
    }

    #[test]
    fn test_non_array_file_fails() {
        assert!(parse_import_file(r#"{"date": "2024-01-05"}"#).is_err());
        assert!(parse_import_file("").is_err());
    }
}

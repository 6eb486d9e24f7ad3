//! Dashboard state, user intents and the derived view
//!
//! `Dashboard` is the single application-state object of the client. It is
//! only mutated by the orchestrator after a confirmed round-trip to the
//! store; every displayed value is derived from it on demand.

use crate::bmi::{self, BmiReport};
use crate::errors::IntentError;
use crate::models::{sort_ascending, sort_descending, Gender, MuscleCategory, Profile, WeightEntry};
use crate::period::{self, PeriodSelector};
use crate::progress::{self, ProgressProjection};
use crate::summary::{self, Summary};
use crate::trend::{self, TrendAnnotation};
use crate::types::{CreateEntryRequest, EntryPage, SaveProfileRequest};
use crate::validation::{
    parse_date_input, parse_weight_input, validate_avatar_file, validate_birth_date,
    validate_clothes_weight, validate_height_cm, validate_weight, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

// ============================================================================
// Intents
// ============================================================================

/// Profile form contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub muscle_category: Option<MuscleCategory>,
    pub target_weight_kg: Option<f64>,
}

/// Everything a user can do on the page
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddEntry { date: String, weight: String },
    DeleteEntry { id: Uuid, confirmed: bool },
    ChangePeriod(PeriodSelector),
    SaveProfile(ProfileForm),
    SaveSettings { clothes_weight: String, ignore_clothes_weight: bool },
    UploadAvatar { file_name: String, content_type: String, bytes: Vec<u8> },
}

/// A validated intent, ready to be executed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateEntry(CreateEntryRequest),
    DeleteEntry(Uuid),
    SetPeriod(PeriodSelector),
    SaveProfile(SaveProfileRequest),
    UploadAvatar { file_name: String, content_type: String, bytes: Vec<u8> },
    /// Nothing to do, e.g. a deletion the user did not confirm
    Noop,
}

// ============================================================================
// Derived view
// ============================================================================

/// Chart data, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Dates as `dd.mm.yyyy`
    pub labels: Vec<String>,
    pub weights: Vec<f64>,
}

/// One row of the history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub date_display: String,
    /// Weight with two decimals
    pub weight_display: String,
    pub clothes_applied: bool,
    pub trend: TrendAnnotation,
}

/// All display values for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    pub period: PeriodSelector,
    pub chart: ChartSeries,
    pub history: Vec<HistoryRow>,
    pub summary: Summary,
    /// `None` leaves the BMI widget untouched
    pub bmi: Option<BmiReport>,
    /// `None` renders placeholders and an empty bar
    pub progress: Option<ProgressProjection>,
    pub clothes_adjustment_active: bool,
    pub avatar_url: String,
}

/// Format a date the way the page shows it
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Derive every display value from one snapshot
///
/// `history` is shown newest first and may be a partial, paginated list;
/// its rows and all other values take their numbers from the full
/// `entries` list, so a row's trend does not change as pages load.
pub fn derive_view(
    entries: &[WeightEntry],
    history: &[WeightEntry],
    profile: &Profile,
    period: &PeriodSelector,
    today: NaiveDate,
) -> DerivedView {
    let mut filtered = period::filter(entries, period, today);
    sort_ascending(&mut filtered);

    let chart = ChartSeries {
        labels: filtered.iter().map(|e| display_date(e.date)).collect(),
        weights: filtered.iter().map(|e| e.weight).collect(),
    };

    let mut all_desc = entries.to_vec();
    sort_descending(&mut all_desc);
    let mut trend_by_id: HashMap<Uuid, TrendAnnotation> = trend::trend(&all_desc)
        .into_iter()
        .map(|annotation| (annotation.entry_id, annotation))
        .collect();

    let mut history_desc = history.to_vec();
    sort_descending(&mut history_desc);
    let history_rows = history_desc
        .iter()
        .zip(trend::trend(&history_desc))
        .map(|(entry, local)| HistoryRow {
            id: entry.id,
            date: entry.date,
            date_display: display_date(entry.date),
            weight_display: format!("{:.2}", entry.weight),
            clothes_applied: entry.clothes_applied,
            // Rows missing from the full list fall back to their page neighbours
            trend: trend_by_id.remove(&entry.id).unwrap_or(local),
        })
        .collect();

    let summary = summary::summarize(entries, &filtered);

    let bmi = profile
        .height_cm
        .and_then(|height| bmi::classify(summary.current, height));

    let progress = profile
        .target_weight_kg
        .and_then(|target| progress::project(entries, target, today));

    DerivedView {
        period: *period,
        chart,
        history: history_rows,
        summary,
        bmi,
        progress,
        clothes_adjustment_active: profile.clothes_adjustment_active(),
        avatar_url: profile.avatar_url.clone(),
    }
}

// ============================================================================
// Decoding stored data
// ============================================================================

/// Decode an entry list, dropping records that do not parse
///
/// A payload that is not a JSON array at all yields an empty list.
pub fn decode_entries(json: &str) -> Vec<WeightEntry> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => decode_entry_values(value),
        Err(e) => {
            warn!(error = %e, "Malformed entry list, falling back to empty data set");
            Vec::new()
        }
    }
}

/// Decode an already parsed entry list
pub fn decode_entry_values(value: Value) -> Vec<WeightEntry> {
    let Value::Array(records) = value else {
        warn!("Entry list is not an array, falling back to empty data set");
        return Vec::new();
    };

    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<WeightEntry>(record) {
            Ok(entry) if entry.weight.is_finite() && entry.weight > 0.0 => Some(entry),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Dropping unreadable entry");
                None
            }
        })
        .collect()
}

/// Decode one history page
///
/// Missing counters are filled from the request and the decoded entries,
/// so a malformed payload reads as an empty final page.
pub fn decode_page(json: &str, requested_page: u32) -> EntryPage {
    let value: Value = serde_json::from_str(json).unwrap_or_else(|e| {
        warn!(error = %e, "Malformed history page");
        Value::Null
    });

    let entries = decode_entry_values(value.get("entries").cloned().unwrap_or(Value::Null));
    let read_u32 = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    let page = read_u32("page").unwrap_or(requested_page);

    EntryPage {
        total: value
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or(entries.len() as u64),
        total_pages: read_u32("total_pages").unwrap_or(page),
        page,
        entries,
    }
}

/// Decode a profile, falling back to the default profile
pub fn decode_profile(json: &str) -> Profile {
    serde_json::from_str(json).unwrap_or_else(|e| {
        warn!(error = %e, "Malformed profile, falling back to defaults");
        Profile::default()
    })
}

// ============================================================================
// Application state
// ============================================================================

/// Client application state
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    /// Full entry list, oldest first
    entries: Vec<WeightEntry>,
    /// Loaded history pages, newest first
    history: Vec<WeightEntry>,
    history_page: u32,
    history_exhausted: bool,
    profile: Option<Profile>,
    period: PeriodSelector,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn history(&self) -> &[WeightEntry] {
        &self.history
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn period(&self) -> PeriodSelector {
        self.period
    }

    pub fn set_period(&mut self, period: PeriodSelector) {
        self.period = period;
    }

    /// Page to request on "load more", `None` once history is exhausted
    pub fn next_history_page(&self) -> Option<u32> {
        if self.history_exhausted {
            None
        } else {
            Some(self.history_page + 1)
        }
    }

    /// Replace the snapshot with the results of a full refresh
    pub fn apply_refresh(
        &mut self,
        mut entries: Vec<WeightEntry>,
        first_page: EntryPage,
        profile: Profile,
        page_size: u32,
    ) {
        sort_ascending(&mut entries);
        self.entries = entries;
        self.history = Vec::new();
        self.history_page = 0;
        self.history_exhausted = false;
        self.append_history_page(first_page, page_size);
        self.profile = Some(profile);
    }

    /// Append one page of history
    ///
    /// A page shorter than the page size, or an empty one, marks the end.
    pub fn append_history_page(&mut self, page: EntryPage, page_size: u32) {
        let received = page.entries.len();
        self.history_exhausted = received == 0 || received < page_size as usize;
        self.history_page = page.page;
        self.history.extend(page.entries);
    }

    /// Replace the profile after a confirmed save
    pub fn apply_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Derive every display value for `today`
    pub fn derive(&self, today: NaiveDate) -> DerivedView {
        let default_profile = Profile::default();
        let profile = self.profile.as_ref().unwrap_or(&default_profile);
        derive_view(&self.entries, &self.history, profile, &self.period, today)
    }

    /// Validate an intent into a command without touching any state
    pub fn validate(&self, intent: Intent, today: NaiveDate) -> Result<Command, IntentError> {
        match intent {
            Intent::AddEntry { date, weight } => {
                let date = parse_date_input(&date).map_err(|m| ValidationError::new("date", &m))?;
                let weight = parse_weight_input(&weight).map_err(|m| ValidationError::new("weight", &m))?;
                let profile = self.profile.as_ref().ok_or(IntentError::ProfileNotLoaded)?;

                let (weight, clothes_applied) = profile.apply_clothes_weight(weight);
                validate_weight(weight).map_err(|m| ValidationError::new("weight", &m))?;

                Ok(Command::CreateEntry(CreateEntryRequest {
                    date,
                    weight,
                    clothes_applied,
                }))
            }
            Intent::DeleteEntry { id, confirmed } => {
                if confirmed {
                    Ok(Command::DeleteEntry(id))
                } else {
                    Ok(Command::Noop)
                }
            }
            Intent::ChangePeriod(period) => {
                if let PeriodSelector::Custom { start, end } = period {
                    if start > end {
                        return Err(IntentError::Validation(
                            "Start date must not be after end date".to_string(),
                        ));
                    }
                }
                Ok(Command::SetPeriod(period))
            }
            Intent::SaveProfile(form) => {
                let profile = self.profile.as_ref().ok_or(IntentError::ProfileNotLoaded)?;
                if let Some(height) = form.height_cm {
                    validate_height_cm(height).map_err(|m| ValidationError::new("height_cm", &m))?;
                }
                if let Some(birth_date) = form.birth_date {
                    validate_birth_date(birth_date, today)
                        .map_err(|m| ValidationError::new("birth_date", &m))?;
                }
                if let Some(target) = form.target_weight_kg {
                    validate_weight(target).map_err(|m| ValidationError::new("target_weight_kg", &m))?;
                }

                Ok(Command::SaveProfile(SaveProfileRequest {
                    gender: form.gender,
                    height_cm: form.height_cm,
                    birth_date: form.birth_date,
                    muscle_category: form.muscle_category,
                    target_weight_kg: form.target_weight_kg,
                    clothes_weight_kg: profile.clothes_weight_kg,
                    ignore_clothes_weight: profile.ignore_clothes_weight,
                }))
            }
            Intent::SaveSettings {
                clothes_weight,
                ignore_clothes_weight,
            } => {
                let profile = self.profile.as_ref().ok_or(IntentError::ProfileNotLoaded)?;
                // An empty or non-numeric field clears the clothes weight
                let clothes_weight_kg = clothes_weight
                    .trim()
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|w| !w.is_nan())
                    .unwrap_or(0.0);
                validate_clothes_weight(clothes_weight_kg)
                    .map_err(|m| ValidationError::new("clothes_weight_kg", &m))?;

                let mut request = SaveProfileRequest::from(profile);
                request.clothes_weight_kg = clothes_weight_kg;
                request.ignore_clothes_weight = ignore_clothes_weight;
                Ok(Command::SaveProfile(request))
            }
            Intent::UploadAvatar {
                file_name,
                content_type,
                bytes,
            } => {
                validate_avatar_file(&file_name, &content_type, bytes.len())
                    .map_err(|m| ValidationError::new("avatar", &m))?;
                Ok(Command::UploadAvatar {
                    file_name,
                    content_type,
                    bytes,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::Direction;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn entry(m: u32, d: u32, weight: f64) -> WeightEntry {
        WeightEntry {
            id: Uuid::new_v4(),
            date: date(m, d),
            weight,
            clothes_applied: false,
        }
    }

    fn page(entries: Vec<WeightEntry>, page: u32) -> EntryPage {
        EntryPage {
            total: entries.len() as u64,
            entries,
            page,
            total_pages: 1,
        }
    }

    fn loaded(profile: Profile) -> Dashboard {
        let all = vec![entry(1, 1, 90.0), entry(3, 1, 86.0), entry(3, 10, 85.0)];
        let mut desc = all.clone();
        sort_descending(&mut desc);
        let mut dashboard = Dashboard::new();
        dashboard.apply_refresh(all, page(desc, 1), profile, 20);
        dashboard
    }

    #[test]
    fn test_derive_full_view() {
        let profile = Profile {
            height_cm: Some(180.0),
            target_weight_kg: Some(80.0),
            ..Default::default()
        };
        let dashboard = loaded(profile);
        let view = dashboard.derive(date(3, 15));

        // Default period is one month back
        assert_eq!(view.chart.labels, vec!["01.03.2024", "10.03.2024"]);
        assert_eq!(view.chart.weights, vec![86.0, 85.0]);

        assert_eq!(view.summary.current, 85.0);
        assert_eq!(view.summary.change_display, "1.0");

        assert_eq!(view.history.len(), 3);
        assert_eq!(view.history[0].weight_display, "85.00");
        assert_eq!(view.history[0].trend.direction, Direction::Down);

        let bmi = view.bmi.unwrap();
        assert_eq!(bmi.bmi_display, "26.2");

        let progress = view.progress.unwrap();
        assert_eq!(progress.start_weight, 90.0);
        assert!((progress.bar_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_without_profile_data() {
        let dashboard = loaded(Profile::default());
        let view = dashboard.derive(date(3, 15));
        assert!(view.bmi.is_none());
        assert!(view.progress.is_none());
        assert!(!view.clothes_adjustment_active);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let dashboard = loaded(Profile {
            height_cm: Some(175.0),
            target_weight_kg: Some(78.0),
            ..Default::default()
        });
        assert_eq!(dashboard.derive(date(3, 15)), dashboard.derive(date(3, 15)));
    }

    #[test]
    fn test_history_pagination_exhaustion() {
        let mut dashboard = Dashboard::new();
        let first: Vec<WeightEntry> = (0..2).map(|i| entry(3, 20 - i, 80.0)).collect();
        dashboard.apply_refresh(first.clone(), page(first, 1), Profile::default(), 2);
        assert_eq!(dashboard.next_history_page(), Some(2));

        dashboard.append_history_page(page(vec![entry(3, 1, 81.0)], 2), 2);
        assert_eq!(dashboard.history().len(), 3);
        assert_eq!(dashboard.next_history_page(), None);
    }

    #[test]
    fn test_empty_page_exhausts_history() {
        let mut dashboard = Dashboard::new();
        dashboard.apply_refresh(Vec::new(), page(Vec::new(), 1), Profile::default(), 20);
        assert_eq!(dashboard.next_history_page(), None);
    }

    #[test]
    fn test_add_entry_applies_clothes_weight() {
        let dashboard = loaded(Profile {
            clothes_weight_kg: 1.0,
            ..Default::default()
        });
        let command = dashboard
            .validate(
                Intent::AddEntry {
                    date: "2024-03-16".to_string(),
                    weight: "86,5".to_string(),
                },
                date(3, 16),
            )
            .unwrap();
        assert_eq!(
            command,
            Command::CreateEntry(CreateEntryRequest {
                date: date(3, 16),
                weight: 85.5,
                clothes_applied: true,
            })
        );
    }

    #[test]
    fn test_add_entry_rejects_bad_input() {
        let dashboard = loaded(Profile::default());
        let missing_date = Intent::AddEntry {
            date: String::new(),
            weight: "80".to_string(),
        };
        assert!(matches!(
            dashboard.validate(missing_date, date(3, 16)),
            Err(IntentError::Validation(_))
        ));

        let bad_weight = Intent::AddEntry {
            date: "2024-03-16".to_string(),
            weight: "abc".to_string(),
        };
        assert!(dashboard.validate(bad_weight, date(3, 16)).is_err());
    }

    #[test]
    fn test_add_entry_needs_profile() {
        let dashboard = Dashboard::new();
        let intent = Intent::AddEntry {
            date: "2024-03-16".to_string(),
            weight: "80".to_string(),
        };
        assert_eq!(
            dashboard.validate(intent, date(3, 16)),
            Err(IntentError::ProfileNotLoaded)
        );
    }

    #[test]
    fn test_unconfirmed_delete_is_noop() {
        let dashboard = loaded(Profile::default());
        let id = Uuid::new_v4();
        assert_eq!(
            dashboard.validate(Intent::DeleteEntry { id, confirmed: false }, date(3, 1)),
            Ok(Command::Noop)
        );
        assert_eq!(
            dashboard.validate(Intent::DeleteEntry { id, confirmed: true }, date(3, 1)),
            Ok(Command::DeleteEntry(id))
        );
    }

    #[test]
    fn test_save_settings_keeps_profile_fields() {
        let dashboard = loaded(Profile {
            height_cm: Some(182.0),
            target_weight_kg: Some(78.0),
            ..Default::default()
        });
        let command = dashboard
            .validate(
                Intent::SaveSettings {
                    clothes_weight: "0.8".to_string(),
                    ignore_clothes_weight: false,
                },
                date(3, 1),
            )
            .unwrap();
        match command {
            Command::SaveProfile(req) => {
                assert_eq!(req.height_cm, Some(182.0));
                assert_eq!(req.target_weight_kg, Some(78.0));
                assert_eq!(req.clothes_weight_kg, 0.8);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_profile_keeps_clothes_settings() {
        let dashboard = loaded(Profile {
            clothes_weight_kg: 1.2,
            ignore_clothes_weight: true,
            ..Default::default()
        });
        let form = ProfileForm {
            gender: Some(Gender::Female),
            height_cm: Some(168.0),
            target_weight_kg: Some(60.0),
            ..Default::default()
        };
        let command = dashboard.validate(Intent::SaveProfile(form), date(3, 1)).unwrap();

        let expected = Command::SaveProfile(SaveProfileRequest {
            gender: Some(Gender::Female),
            height_cm: Some(168.0),
            birth_date: None,
            muscle_category: None,
            target_weight_kg: Some(60.0),
            clothes_weight_kg: 1.2,
            ignore_clothes_weight: true,
        });
        assert_eq!(command, expected);
        assert_ne!(command, Command::Noop);
    }

    #[test]
    fn test_history_trend_spans_page_boundary() {
        let all = vec![entry(3, 1, 90.0), entry(3, 2, 85.0), entry(3, 3, 84.0)];
        let mut desc = all.clone();
        sort_descending(&mut desc);
        let first_page = page(desc[..2].to_vec(), 1);

        let mut dashboard = Dashboard::new();
        dashboard.apply_refresh(all, first_page, Profile::default(), 2);
        let view = dashboard.derive(date(3, 15));

        assert_eq!(view.history.len(), 2);
        let oldest_loaded = &view.history[1];
        assert_eq!(oldest_loaded.date, date(3, 2));
        assert_eq!(oldest_loaded.trend.trend, -5.0);
        assert_eq!(oldest_loaded.trend.direction, Direction::Down);
        assert_eq!(oldest_loaded.trend.magnitude, "5.0");
        assert_eq!(view.history[0].trend.trend, -1.0);

        let before = view.history.clone();
        dashboard.append_history_page(page(desc[2..].to_vec(), 2), 2);
        let after = dashboard.derive(date(3, 15)).history;
        assert_eq!(&after[..2], &before[..]);
        assert_eq!(after[2].trend.trend, 0.0);
    }

    #[test]
    fn test_save_settings_blank_clears_clothes_weight() {
        let dashboard = loaded(Profile {
            clothes_weight_kg: 1.5,
            ..Default::default()
        });
        let command = dashboard
            .validate(
                Intent::SaveSettings {
                    clothes_weight: "  ".to_string(),
                    ignore_clothes_weight: true,
                },
                date(3, 1),
            )
            .unwrap();
        match command {
            Command::SaveProfile(req) => {
                assert_eq!(req.clothes_weight_kg, 0.0);
                assert!(req.ignore_clothes_weight);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_profile_validates_height() {
        let dashboard = loaded(Profile::default());
        let form = ProfileForm {
            height_cm: Some(20.0),
            ..Default::default()
        };
        assert!(dashboard.validate(Intent::SaveProfile(form), date(3, 1)).is_err());
    }

    #[test]
    fn test_inverted_custom_period_rejected() {
        let dashboard = Dashboard::new();
        let intent = Intent::ChangePeriod(PeriodSelector::Custom {
            start: date(3, 10),
            end: date(3, 1),
        });
        assert!(dashboard.validate(intent, date(3, 15)).is_err());
    }

    #[test]
    fn test_decode_entries_drops_bad_records() {
        let json = r#"[
            {"id":"00000000-0000-0000-0000-000000000001","date":"2024-03-01","weight":80.5},
            {"id":"00000000-0000-0000-0000-000000000002","date":"not a date","weight":80.0},
            {"id":"00000000-0000-0000-0000-000000000003","date":"2024-03-02","weight":-4}
        ]"#;
        let entries = decode_entries(json);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date(3, 1));
        assert!(!entries[0].clothes_applied);
    }

    #[test]
    fn test_decode_page() {
        let json = r#"{
            "entries": [
                {"id":"00000000-0000-0000-0000-000000000001","date":"2024-03-02","weight":80.1},
                {"id":"00000000-0000-0000-0000-000000000002","date":"2024-13-40","weight":80.0}
            ],
            "total": 41, "page": 2, "total_pages": 3
        }"#;
        let page = decode_page(json, 2);
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.total, 41);
        assert_eq!(page.total_pages, 3);

        let broken = decode_page("<html>", 4);
        assert!(broken.entries.is_empty());
        assert_eq!(broken.page, 4);
        assert_eq!(broken.total, 0);
    }

    #[test]
    fn test_decode_malformed_payload_is_empty() {
        assert!(decode_entries("{not json").is_empty());
        assert!(decode_entries(r#"{"weights": []}"#).is_empty());
        assert_eq!(decode_profile("[]"), Profile::default());
    }
}

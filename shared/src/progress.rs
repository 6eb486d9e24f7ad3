//! Progress toward the target weight
//!
//! Projects a completion date with a fixed weekly decay model and computes
//! the progress bar fill.

use crate::models::WeightEntry;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Assumed weekly loss rate: 0.75% of body weight
pub const WEEKLY_LOSS_RATE: f64 = 0.0075;

/// Gain from the start weight that fills the bar in gain mode
pub const GAIN_MODE_FULL_SCALE_KG: f64 = 10.0;

/// How the projection relates to the decay model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionStatus {
    /// Target is below the current weight and reachable by loss
    OnTrack,
    /// Current weight already equals the target
    AtTarget,
    /// Target is above the current weight; the loss-only model reports 0 weeks
    TargetRequiresGain,
}

/// Everything the progress widget displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressProjection {
    pub start_weight: f64,
    pub start_date: NaiveDate,
    pub current_weight: f64,
    pub target_weight: f64,
    pub weeks_to_target: u32,
    pub projected_date: NaiveDate,
    /// Bar fill, 0..100
    pub bar_percent: f64,
    pub is_gain_mode: bool,
    pub status: ProjectionStatus,
}

/// Weeks of 0.75% weekly loss until `current` drops to `target` or below
pub fn weeks_to_target(current: f64, target: f64) -> u32 {
    if !(target > 0.0) || !current.is_finite() {
        return 0;
    }

    let mut weight = current;
    let mut weeks = 0;
    while weight > target {
        weight *= 1.0 - WEEKLY_LOSS_RATE;
        weeks += 1;
    }
    weeks
}

/// Bar fill for the given weights
///
/// Gain mode (current above start) fills 100% at a 10 kg gain. Loss mode
/// measures the share of the start-to-target distance already covered.
pub fn bar_percent(start: f64, current: f64, target: f64) -> (f64, bool) {
    let is_gain_mode = current > start;
    let percent = if is_gain_mode {
        (current - start) / GAIN_MODE_FULL_SCALE_KG * 100.0
    } else {
        let total = start - target;
        if total > 0.0 {
            (start - current) / total * 100.0
        } else {
            0.0
        }
    };
    (percent.clamp(0.0, 100.0), is_gain_mode)
}

/// Project progress from the full entry list
///
/// Returns `None` without entries or without a positive target; the widget
/// then shows placeholders and an empty bar.
pub fn project(all: &[WeightEntry], target_weight: f64, today: NaiveDate) -> Option<ProgressProjection> {
    if !(target_weight > 0.0) {
        return None;
    }
    let start = all.iter().min_by_key(|e| e.date)?;
    let current = all.iter().max_by_key(|e| e.date)?;

    let weeks = weeks_to_target(current.weight, target_weight);
    let projected_date = today
        .checked_add_days(Days::new(u64::from(weeks) * 7))
        .unwrap_or(NaiveDate::MAX);
    let (bar_percent, is_gain_mode) = bar_percent(start.weight, current.weight, target_weight);

    let status = if target_weight < current.weight {
        ProjectionStatus::OnTrack
    } else if target_weight == current.weight {
        ProjectionStatus::AtTarget
    } else {
        ProjectionStatus::TargetRequiresGain
    };

    Some(ProgressProjection {
        start_weight: start.weight,
        start_date: start.date,
        current_weight: current.weight,
        target_weight,
        weeks_to_target: weeks,
        projected_date,
        bar_percent,
        is_gain_mode,
        status,
    })
}

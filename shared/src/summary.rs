//! Current weight and change over the selected period

use crate::models::WeightEntry;
use crate::trend::Direction;
use serde::{Deserialize, Serialize};

/// Header values above the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Latest weight overall, 0 when there are no entries
    pub current: f64,
    /// Earliest weight inside the filtered window, 0 when it is empty
    pub period_start: f64,
    pub change: f64,
    pub direction: Direction,
    /// `current` with two decimals
    pub current_display: String,
    /// `|change|` with one decimal
    pub change_display: String,
}

/// Summarize the latest weight and its change across the filtered window
pub fn summarize(all: &[WeightEntry], filtered: &[WeightEntry]) -> Summary {
    let current = all
        .iter()
        .max_by_key(|e| e.date)
        .map(|e| e.weight)
        .unwrap_or(0.0);
    let period_start = filtered
        .iter()
        .min_by_key(|e| e.date)
        .map(|e| e.weight)
        .unwrap_or(0.0);
    let change = current - period_start;

    Summary {
        current,
        period_start,
        change,
        direction: Direction::of(change),
        current_display: format!("{:.2}", current),
        change_display: format!("{:.1}", change.abs()),
    }
}

//! Entry-to-entry trend annotations for the history table

use crate::models::WeightEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction icon shown next to a delta
///
/// Anything that is not strictly positive renders as `Down`, including a
/// change of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Trend annotation for one history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnnotation {
    pub entry_id: Uuid,
    /// Signed delta to the chronologically previous entry, one decimal
    pub trend: f64,
    pub direction: Direction,
    /// `|trend|` rendered with one decimal
    pub magnitude: String,
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Annotate a newest-first series with per-entry trend
///
/// The input must already be sorted by date descending. Each entry is
/// compared with the one after it; the oldest entry gets a trend of zero.
pub fn trend(sorted_desc: &[WeightEntry]) -> Vec<TrendAnnotation> {
    sorted_desc
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let delta = sorted_desc
                .get(i + 1)
                .map(|previous| round1(entry.weight - previous.weight))
                .unwrap_or(0.0);
            TrendAnnotation {
                entry_id: entry.id,
                trend: delta,
                direction: Direction::of(delta),
                magnitude: format!("{:.1}", delta.abs()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn entry(day: u32, weight: f64) -> WeightEntry {
        WeightEntry::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), weight)
    }

    #[test]
    fn test_three_entry_series() {
        let series = vec![entry(3, 80.0), entry(2, 82.0), entry(1, 79.0)];
        let rows = trend(&series);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].trend, -2.0);
        assert_eq!(rows[0].direction, Direction::Down);
        assert_eq!(rows[0].magnitude, "2.0");

        assert_eq!(rows[1].trend, 3.0);
        assert_eq!(rows[1].direction, Direction::Up);
        assert_eq!(rows[1].magnitude, "3.0");
    }

    #[test]
    fn test_oldest_entry_has_zero_trend_and_down_icon() {
        let rows = trend(&[entry(2, 80.0), entry(1, 79.5)]);
        let oldest = rows.last().unwrap();
        assert_eq!(oldest.trend, 0.0);
        assert_eq!(oldest.direction, Direction::Down);
        assert_eq!(oldest.magnitude, "0.0");
    }

    #[test]
    fn test_zero_change_renders_down() {
        let rows = trend(&[entry(2, 80.0), entry(1, 80.0)]);
        assert_eq!(rows[0].direction, Direction::Down);
    }

    #[test]
    fn test_direction_follows_rounded_delta() {
        // +0.04 rounds to 0.0, so no upward arrow
        let rows = trend(&[entry(2, 80.04), entry(1, 80.0)]);
        assert_eq!(rows[0].trend, 0.0);
        assert_eq!(rows[0].direction, Direction::Down);
    }

    #[test]
    fn test_empty_series() {
        assert!(trend(&[]).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_one_annotation_per_entry(weights in prop::collection::vec(40.0f64..200.0, 0..28)) {
            let series: Vec<WeightEntry> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| entry(28 - i as u32, *w))
                .collect();
            let rows = trend(&series);
            prop_assert_eq!(rows.len(), series.len());
            prop_assert_eq!(trend(&series), rows);
        }
    }
}

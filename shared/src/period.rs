//! Period selection and filtering
//!
//! Selects the entries that fall inside a named window relative to today,
//! or inside an explicit custom range.

use crate::models::WeightEntry;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time window used for chart and summary filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PeriodSelector {
    Week,
    #[default]
    Month,
    Year,
    All,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl PeriodSelector {
    /// Inclusive lower bound of a relative period
    ///
    /// Returns `None` for `All` and `Custom`, which have no relative start.
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            PeriodSelector::Week => today.checked_sub_days(Days::new(7)),
            PeriodSelector::Month => today.checked_sub_months(Months::new(1)),
            PeriodSelector::Year => today.checked_sub_months(Months::new(12)),
            PeriodSelector::All | PeriodSelector::Custom { .. } => None,
        }
    }

    /// Whether a single date falls inside this period
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            PeriodSelector::All => true,
            PeriodSelector::Custom { start, end } => {
                // The end day counts in full: compare against the day after it.
                let end_exclusive = end.checked_add_days(Days::new(1));
                date >= *start && end_exclusive.map_or(true, |e| date < e)
            }
            relative => match relative.start_date(today) {
                Some(start) => date >= start,
                None => true,
            },
        }
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodSelector::Week => write!(f, "week"),
            PeriodSelector::Month => write!(f, "month"),
            PeriodSelector::Year => write!(f, "year"),
            PeriodSelector::All => write!(f, "all"),
            PeriodSelector::Custom { start, end } => write!(f, "{}..{}", start, end),
        }
    }
}

/// Parses a named period; anything unrecognised selects everything
impl FromStr for PeriodSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "week" => PeriodSelector::Week,
            "month" => PeriodSelector::Month,
            "year" => PeriodSelector::Year,
            _ => PeriodSelector::All,
        })
    }
}

/// Filter entries down to the selected period
///
/// Order of the input is preserved. `All` returns every entry.
pub fn filter(entries: &[WeightEntry], selector: &PeriodSelector, today: NaiveDate) -> Vec<WeightEntry> {
    entries
        .iter()
        .filter(|e| selector.contains(e.date, today))
        .cloned()
        .collect()
}

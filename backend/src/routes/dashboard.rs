//! Derived dashboard API route

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::DashboardService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use weight_tracker_shared::dashboard::DerivedView;
use weight_tracker_shared::period::PeriodSelector;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// Period selection query
///
/// `period=custom` needs both `start` and `end`; other names are parsed
/// leniently and unknown ones select everything.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub period: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DashboardQuery {
    pub fn selector(&self) -> Result<PeriodSelector, ApiError> {
        let name = self.period.as_deref().map(str::trim).unwrap_or("month");
        if !name.eq_ignore_ascii_case("custom") {
            return Ok(name.parse().unwrap_or_default());
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Ok(PeriodSelector::Custom { start, end }),
            (Some(_), Some(_)) => Err(ApiError::Validation(
                "Start date must not be after end date".to_string(),
            )),
            _ => Err(ApiError::Validation(
                "Custom period needs start and end dates".to_string(),
            )),
        }
    }
}

/// GET /api/v1/dashboard - Every display value for the selected period
async fn get_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DerivedView>, ApiError> {
    let period = query.selector()?;
    let today = Utc::now().date_naive();
    let view = DashboardService::build(state.db(), user.user_id, period, today).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(period: Option<&str>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> DashboardQuery {
        DashboardQuery {
            period: period.map(String::from),
            start,
            end,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[rstest]
    #[case(None, PeriodSelector::Month)]
    #[case(Some("week"), PeriodSelector::Week)]
    #[case(Some("YEAR"), PeriodSelector::Year)]
    #[case(Some("all"), PeriodSelector::All)]
    #[case(Some("fortnight"), PeriodSelector::All)]
    fn test_named_periods(#[case] name: Option<&str>, #[case] expected: PeriodSelector) {
        assert_eq!(query(name, None, None).selector().unwrap(), expected);
    }

    #[test]
    fn test_custom_period() {
        let q = query(Some("custom"), Some(date(1)), Some(date(10)));
        assert_eq!(
            q.selector().unwrap(),
            PeriodSelector::Custom { start: date(1), end: date(10) }
        );
    }

    #[test]
    fn test_custom_period_errors() {
        assert!(query(Some("custom"), Some(date(10)), Some(date(1))).selector().is_err());
        assert!(query(Some("custom"), Some(date(1)), None).selector().is_err());
    }
}

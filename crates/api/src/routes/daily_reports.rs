//! Daily report intake.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use domain::models::daily_report::{ListDailyReportsQuery, ListDailyReportsResponse};
use domain::models::{DailyReport, DateRange, SubmitDailyReportRequest};
use domain::services::MAX_RANGE_DAYS;
use persistence::repositories::DailyReportRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::ensure_can_view_employee;

/// POST /api/v1/daily-reports
///
/// Reports are always filed for the caller. Resubmitting a date replaces it.
pub async fn submit_daily_report(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<SubmitDailyReportRequest>,
) -> Result<(StatusCode, Json<DailyReport>), ApiError> {
    request.validate()?;

    let today = Utc::now().date_naive();
    if request.report_date > today {
        return Err(ApiError::Validation(
            "report_date cannot be in the future".to_string(),
        ));
    }

    let repo = DailyReportRepository::new(state.pool.clone());
    let report: DailyReport = repo
        .upsert(auth.employee_id, request.report_date, &request.parameter_values)
        .await?
        .into();

    info!(
        report_id = %report.id,
        employee_id = %auth.employee_id,
        report_date = %report.report_date,
        "Daily report submitted"
    );
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/daily-reports
///
/// Defaults to the caller and the current month up to today.
pub async fn list_daily_reports(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListDailyReportsQuery>,
) -> Result<Json<ListDailyReportsResponse>, ApiError> {
    let employee_id = query.employee_id.unwrap_or(auth.employee_id);
    ensure_can_view_employee(&state, &auth, employee_id).await?;

    let range = listing_range(&query, Utc::now().date_naive())?;

    let repo = DailyReportRepository::new(state.pool.clone());
    let data: Vec<DailyReport> = repo
        .find_in_range(&[employee_id], range.start, range.end)
        .await?
        .into_iter()
        .map(DailyReport::from)
        .collect();

    Ok(Json(ListDailyReportsResponse {
        count: data.len(),
        data,
    }))
}

/// Missing bounds default to the month of `end_date` up to today.
fn listing_range(query: &ListDailyReportsQuery, today: NaiveDate) -> Result<DateRange, ApiError> {
    let end = query.end_date.unwrap_or(today);
    let start = query
        .start_date
        .or_else(|| end.with_day(1))
        .unwrap_or(end);

    let range = DateRange::new(start, end).ok_or_else(|| {
        ApiError::Validation("end_date must not be before start_date".to_string())
    })?;
    if range.len_days() > MAX_RANGE_DAYS {
        return Err(ApiError::Validation(format!(
            "Date range spans {} days, the maximum is {}",
            range.len_days(),
            MAX_RANGE_DAYS
        )));
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ListDailyReportsQuery {
        ListDailyReportsQuery {
            employee_id: None,
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_listing_defaults_to_month_to_date() {
        let range = listing_range(&query(None, None), date(2024, 3, 14)).unwrap();
        assert_eq!(range.start, date(2024, 3, 1));
        assert_eq!(range.end, date(2024, 3, 14));
    }

    #[test]
    fn test_listing_rejects_reversed_bounds() {
        let result = listing_range(
            &query(Some(date(2024, 3, 10)), Some(date(2024, 3, 1))),
            date(2024, 3, 14),
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_listing_rejects_unbounded_history() {
        let result = listing_range(
            &query(Some(NaiveDate::MIN), Some(date(2024, 3, 1))),
            date(2024, 3, 14),
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let longest = listing_range(
            &query(Some(date(2022, 1, 1)), Some(date(2024, 12, 31))),
            date(2025, 1, 1),
        )
        .unwrap();
        assert_eq!(longest.len_days(), MAX_RANGE_DAYS);
    }
}

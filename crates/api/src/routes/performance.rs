//! Performance report routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::performance::{PerformanceQuery, TeamPerformanceQuery};
use domain::models::{EmployeeReportPerformance, TeamReportPerformance};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_performance_report;
use crate::routes::{ensure_can_view_employee, resolve_manager_scope};
use crate::services::performance::{PerformanceError, PerformanceService};

impl From<PerformanceError> for ApiError {
    fn from(err: PerformanceError) -> Self {
        match err {
            PerformanceError::EmployeeNotFound(_) => ApiError::NotFound(err.to_string()),
            PerformanceError::Range(e) => ApiError::Validation(e.to_string()),
            PerformanceError::Database(e) => e.into(),
        }
    }
}

fn service(state: &AppState) -> PerformanceService {
    PerformanceService::new(
        state.pool.clone(),
        state.config.calendar.working_days_of_week.clone(),
        state.config.performance.aggregation_options(),
    )
}

/// GET /api/v1/performance/me
pub async fn get_my_performance(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<EmployeeReportPerformance>, ApiError> {
    let report = service(&state)
        .employee_performance(auth.employee_id, &query)
        .await?;
    record_performance_report("employee");

    Ok(Json(report))
}

/// GET /api/v1/performance/employees/:employee_id
pub async fn get_employee_performance(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(employee_id): Path<Uuid>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<EmployeeReportPerformance>, ApiError> {
    ensure_can_view_employee(&state, &auth, employee_id).await?;

    let report = service(&state)
        .employee_performance(employee_id, &query)
        .await?;
    record_performance_report("employee");

    Ok(Json(report))
}

/// GET /api/v1/performance/team
pub async fn get_team_performance(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<TeamPerformanceQuery>,
) -> Result<Json<TeamReportPerformance>, ApiError> {
    let manager_id = resolve_manager_scope(&auth, query.manager_id)?;

    let report = service(&state)
        .team_performance(manager_id, &query.performance_query())
        .await?;
    record_performance_report("team");

    tracing::debug!(
        manager_id = %manager_id,
        members = report.employees.len(),
        "Team performance computed"
    );
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};
    use chrono::NaiveDate;
    use domain::services::AggregationError;

    #[test]
    fn test_invalid_range_is_bad_request() {
        let err: ApiError = PerformanceError::Range(AggregationError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_employee_is_not_found() {
        let err: ApiError = PerformanceError::EmployeeNotFound(Uuid::new_v4()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}

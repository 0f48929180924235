//! Company holiday calendar routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use domain::models::holiday::{CreateHolidayRequest, ListHolidaysQuery, ListHolidaysResponse};
use domain::models::Holiday;
use persistence::repositories::HolidayRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// POST /api/v1/holidays
///
/// A date can only hold one holiday; duplicates return 409.
pub async fn create_holiday(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateHolidayRequest>,
) -> Result<(StatusCode, Json<Holiday>), ApiError> {
    request.validate()?;

    let repo = HolidayRepository::new(state.pool.clone());
    let holiday: Holiday = repo
        .create(request.holiday_date, request.name.trim())
        .await?
        .into();

    info!(
        holiday_date = %holiday.holiday_date,
        created_by = %auth.employee_id,
        "Holiday added"
    );
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// GET /api/v1/holidays
pub async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<ListHolidaysQuery>,
) -> Result<Json<ListHolidaysResponse>, ApiError> {
    let repo = HolidayRepository::new(state.pool.clone());
    let data: Vec<Holiday> = repo
        .list(query.year)
        .await?
        .into_iter()
        .map(Holiday::from)
        .collect();

    Ok(Json(ListHolidaysResponse {
        count: data.len(),
        data,
    }))
}

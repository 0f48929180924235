//! Feedback routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::feedback::{
    BulkFeedbackResult, BulkHrFeedbackRequest, CreateFeedbackRequest, CreateHrFeedbackRequest,
    ListFeedbackQuery, ListFeedbackResponse,
};
use domain::models::{Feedback, FeedbackStatistics};
use shared::pagination::Paginated;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_feedback_sent;
use crate::services::feedback::{FeedbackError, FeedbackService};

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::RecipientNotFound(_) | FeedbackError::NotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            FeedbackError::Database(e) => e.into(),
        }
    }
}

/// POST /api/v1/feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    request.validate()?;

    let feedback = FeedbackService::new(state.pool.clone())
        .create(auth.employee_id, &request)
        .await?;
    record_feedback_sent("employee", 1);

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// POST /api/v1/feedback/hr
pub async fn create_hr_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateHrFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    request.validate()?;

    let feedback = FeedbackService::new(state.pool.clone())
        .create_hr_feedback(auth.employee_id, &request)
        .await?;
    record_feedback_sent("hr", 1);

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// POST /api/v1/feedback/hr/bulk
///
/// 201 whenever the request is valid; unknown recipients are listed in
/// `invalid_employee_ids`.
pub async fn create_bulk_hr_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<BulkHrFeedbackRequest>,
) -> Result<(StatusCode, Json<BulkFeedbackResult>), ApiError> {
    request.validate()?;

    let max = state.config.limits.max_bulk_employees;
    if request.to_ids.len() > max {
        return Err(ApiError::Validation(format!(
            "At most {} recipients per bulk request",
            max
        )));
    }

    let result = FeedbackService::new(state.pool.clone())
        .create_bulk_hr_feedback(auth.employee_id, &request)
        .await?;
    record_feedback_sent("hr", result.sent);

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/v1/feedback
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<Json<Paginated<Feedback>>, ApiError> {
    let page = FeedbackService::new(state.pool.clone())
        .find_all(&query, state.config.limits.max_page_size)
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/feedback/statistics
pub async fn get_feedback_statistics(
    State(state): State<AppState>,
) -> Result<Json<FeedbackStatistics>, ApiError> {
    let stats = FeedbackService::new(state.pool.clone()).statistics().await?;
    Ok(Json(stats))
}

/// GET /api/v1/feedback/received
///
/// Non-confidential feedback addressed to the caller.
pub async fn list_received_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListFeedbackResponse>, ApiError> {
    let data = FeedbackService::new(state.pool.clone())
        .find_received(auth.employee_id)
        .await?;

    Ok(Json(ListFeedbackResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/v1/feedback/:id
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<Uuid>,
) -> Result<Json<Feedback>, ApiError> {
    let feedback = FeedbackService::new(state.pool.clone())
        .find_by_id(feedback_id)
        .await?;
    Ok(Json(feedback))
}

/// DELETE /api/v1/feedback/:id
pub async fn delete_feedback(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(feedback_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    FeedbackService::new(state.pool.clone())
        .delete(feedback_id)
        .await?;
    tracing::info!(feedback_id = %feedback_id, deleted_by = %auth.employee_id, "Feedback removed");

    Ok(StatusCode::NO_CONTENT)
}

//! Target management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::target::{
    BulkCreateTargetRequest, BulkTargetResult, CreateTargetRequest, ListTargetsQuery,
    ListTargetsResponse, TeamTargetStats, TeamTargetsQuery, TeamTargetsResponse,
    UpdateTargetRequest,
};
use domain::models::{EmployeeRole, Target};
use shared::validation::month_key;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_targets_created;
use crate::routes::{check_target_month, ensure_can_view_employee, resolve_manager_scope};
use crate::services::targets::{TargetError, TargetQuery, TargetService};

impl From<TargetError> for ApiError {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::EmployeeNotFound(_) | TargetError::TargetNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            TargetError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            TargetError::Database(e) => e.into(),
        }
    }
}

/// Managers may only touch targets of their direct reports.
async fn ensure_manages(
    service: &TargetService,
    auth: &UserAuth,
    employee_id: Uuid,
) -> Result<(), ApiError> {
    if auth.role == EmployeeRole::Manager
        && !service.is_direct_report(auth.employee_id, employee_id).await?
    {
        return Err(ApiError::Forbidden(
            "Employee is not one of your direct reports".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/v1/targets
pub async fn create_target(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateTargetRequest>,
) -> Result<(StatusCode, Json<Target>), ApiError> {
    request.validate()?;

    let service = TargetService::new(state.pool.clone());
    ensure_manages(&service, &auth, request.employee_id).await?;

    let target = service.create(&request, auth.employee_id).await?;
    record_targets_created("single", 1);

    Ok((StatusCode::CREATED, Json(target)))
}

/// POST /api/v1/targets/bulk
///
/// Always 200 once the request is valid; per-employee failures are in `errors`.
pub async fn bulk_create_targets(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<BulkCreateTargetRequest>,
) -> Result<Json<BulkTargetResult>, ApiError> {
    request.validate()?;

    let max = state.config.limits.max_bulk_employees;
    if request.employee_ids.len() > max {
        return Err(ApiError::Validation(format!(
            "At most {} employees per bulk request",
            max
        )));
    }

    let service = TargetService::new(state.pool.clone());
    let team = match auth.role {
        EmployeeRole::Manager => Some(service.team_ids(auth.employee_id).await?),
        _ => None,
    };

    let result = service
        .bulk_create(&request, team.as_ref(), auth.employee_id)
        .await?;
    record_targets_created("bulk", result.created);

    Ok(Json(result))
}

/// GET /api/v1/targets
///
/// Managers only see their own team.
pub async fn list_targets(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListTargetsQuery>,
) -> Result<Json<ListTargetsResponse>, ApiError> {
    check_target_month(query.target_month.as_deref())?;

    let manager_id = match auth.role {
        EmployeeRole::Manager => Some(resolve_manager_scope(&auth, query.manager_id)?),
        _ => query.manager_id,
    };

    let service = TargetService::new(state.pool.clone());
    let data = service
        .find_all(TargetQuery {
            employee_id: query.employee_id,
            target_month: query.target_month,
            manager_id,
        })
        .await?;

    Ok(Json(ListTargetsResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/v1/targets/employee/:employee_id/:target_month
///
/// Returns `null` when the employee has no active target for the month.
pub async fn get_employee_target(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((employee_id, target_month)): Path<(Uuid, String)>,
) -> Result<Json<Option<Target>>, ApiError> {
    check_target_month(Some(&target_month))?;
    ensure_can_view_employee(&state, &auth, employee_id).await?;

    let service = TargetService::new(state.pool.clone());
    let target = service
        .find_by_employee_and_month(employee_id, &target_month)
        .await?;

    Ok(Json(target))
}

/// GET /api/v1/targets/team
pub async fn get_team_targets(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<TeamTargetsQuery>,
) -> Result<Json<TeamTargetsResponse>, ApiError> {
    check_target_month(query.target_month.as_deref())?;
    let manager_id = resolve_manager_scope(&auth, query.manager_id)?;

    let service = TargetService::new(state.pool.clone());
    let response = service.team_targets(manager_id, query.target_month).await?;

    Ok(Json(response))
}

/// GET /api/v1/targets/team/stats
///
/// `target_month` defaults to the current month.
pub async fn get_team_target_stats(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<TeamTargetsQuery>,
) -> Result<Json<TeamTargetStats>, ApiError> {
    check_target_month(query.target_month.as_deref())?;
    let manager_id = resolve_manager_scope(&auth, query.manager_id)?;
    let target_month = query
        .target_month
        .unwrap_or_else(|| month_key(Utc::now().date_naive()));

    let service = TargetService::new(state.pool.clone());
    let stats = service.team_stats(manager_id, target_month).await?;

    Ok(Json(stats))
}

/// PATCH /api/v1/targets/:id
pub async fn update_target(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(target_id): Path<Uuid>,
    Json(request): Json<UpdateTargetRequest>,
) -> Result<Json<Target>, ApiError> {
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let service = TargetService::new(state.pool.clone());
    let current = service.find_by_id(target_id).await?;
    ensure_manages(&service, &auth, current.employee_id).await?;

    let target = service
        .update(target_id, &request, auth.employee_id)
        .await?;

    Ok(Json(target))
}

/// DELETE /api/v1/targets/:id
///
/// Soft delete; the record stays for history.
pub async fn delete_target(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(target_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let service = TargetService::new(state.pool.clone());
    let current = service.find_by_id(target_id).await?;
    ensure_manages(&service, &auth, current.employee_id).await?;

    service.remove(target_id).await?;
    tracing::info!(target_id = %target_id, deleted_by = %auth.employee_id, "Target removed");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/targets/:id/permanent
pub async fn hard_delete_target(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(target_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let service = TargetService::new(state.pool.clone());
    service.hard_delete(target_id).await?;
    tracing::info!(target_id = %target_id, deleted_by = %auth.employee_id, "Target purged");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_target_error_mapping() {
        let conflict: ApiError = TargetError::AlreadyExists {
            employee_id: Uuid::new_v4(),
            target_month: "2024-03".to_string(),
        }
        .into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let missing: ApiError = TargetError::TargetNotFound(Uuid::new_v4()).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let employee: ApiError = TargetError::EmployeeNotFound(Uuid::new_v4()).into();
        assert_eq!(employee.into_response().status(), StatusCode::NOT_FOUND);
    }
}

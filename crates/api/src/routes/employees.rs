//! Employee directory routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::employee::{
    CreateEmployeeRequest, ListEmployeesQuery, ListEmployeesResponse,
};
use domain::models::{Employee, EmployeeRole};
use persistence::entities::EmployeeRoleDb;
use persistence::repositories::EmployeeRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::{ensure_can_view_employee, resolve_manager_scope};

/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    request.validate()?;

    let repo = EmployeeRepository::new(state.pool.clone());
    if let Some(manager_id) = request.manager_id {
        if repo.find_by_id(manager_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Manager {} not found",
                manager_id
            )));
        }
    }

    let employee: Employee = repo
        .create(
            &request.employee_code,
            &request.full_name,
            &request.email.to_lowercase(),
            EmployeeRoleDb::from(request.role),
            request.manager_id,
        )
        .await?
        .into();

    info!(
        employee_id = %employee.id,
        role = %employee.role,
        created_by = %auth.employee_id,
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/v1/employees
///
/// Managers are limited to their direct reports.
pub async fn list_employees(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<ListEmployeesResponse>, ApiError> {
    let manager_id = match auth.role {
        EmployeeRole::Manager => Some(resolve_manager_scope(&auth, query.manager_id)?),
        _ => query.manager_id,
    };

    let repo = EmployeeRepository::new(state.pool.clone());
    let data: Vec<Employee> = repo
        .list(query.role.map(EmployeeRoleDb::from), manager_id)
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();

    Ok(Json(ListEmployeesResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/v1/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(employee_id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    ensure_can_view_employee(&state, &auth, employee_id).await?;

    let repo = EmployeeRepository::new(state.pool.clone());
    let employee = repo
        .find_by_id(employee_id)
        .await?
        .map(Employee::from)
        .ok_or_else(|| ApiError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

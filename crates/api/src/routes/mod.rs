//! HTTP route handlers.

pub mod daily_reports;
pub mod employees;
pub mod feedback;
pub mod health;
pub mod holidays;
pub mod performance;
pub mod targets;

use domain::models::EmployeeRole;
use persistence::repositories::EmployeeRepository;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Checks the caller may read data belonging to `employee_id`.
///
/// Everyone may read their own data, HR and admins anyone's, managers their
/// direct reports'.
pub(crate) async fn ensure_can_view_employee(
    state: &AppState,
    auth: &UserAuth,
    employee_id: Uuid,
) -> Result<(), ApiError> {
    if auth.is_self(employee_id) || auth.is_hr_or_admin() {
        return Ok(());
    }

    if auth.role == EmployeeRole::Manager {
        let repo = EmployeeRepository::new(state.pool.clone());
        if repo.is_direct_report(auth.employee_id, employee_id).await? {
            return Ok(());
        }
        return Err(ApiError::Forbidden(
            "Employee is not one of your direct reports".to_string(),
        ));
    }

    Err(ApiError::Forbidden(
        "You can only access your own records".to_string(),
    ))
}

/// Resolves the manager whose team is queried.
///
/// Managers are pinned to their own team; HR and admins may name any manager
/// and default to themselves.
pub(crate) fn resolve_manager_scope(
    auth: &UserAuth,
    requested: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match requested {
        Some(manager_id) if manager_id != auth.employee_id && !auth.is_hr_or_admin() => Err(
            ApiError::Forbidden("Managers can only access their own team".to_string()),
        ),
        Some(manager_id) => Ok(manager_id),
        None => Ok(auth.employee_id),
    }
}

/// Validates an optional `YYYY-MM` query value.
pub(crate) fn check_target_month(month: Option<&str>) -> Result<(), ApiError> {
    match month {
        Some(month) => shared::validation::validate_target_month(month).map_err(|_| {
            ApiError::Validation("target_month must be in YYYY-MM format".to_string())
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: EmployeeRole) -> UserAuth {
        UserAuth {
            employee_id: Uuid::new_v4(),
            role,
            jti: "jti".to_string(),
        }
    }

    #[test]
    fn test_manager_scope_defaults_to_self() {
        let manager = auth(EmployeeRole::Manager);
        assert_eq!(
            resolve_manager_scope(&manager, None).unwrap(),
            manager.employee_id
        );
        assert_eq!(
            resolve_manager_scope(&manager, Some(manager.employee_id)).unwrap(),
            manager.employee_id
        );
    }

    #[test]
    fn test_manager_cannot_query_other_team() {
        let manager = auth(EmployeeRole::Manager);
        assert!(matches!(
            resolve_manager_scope(&manager, Some(Uuid::new_v4())),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_hr_can_query_any_team() {
        let hr = auth(EmployeeRole::Hr);
        let other = Uuid::new_v4();
        assert_eq!(resolve_manager_scope(&hr, Some(other)).unwrap(), other);
    }

    #[test]
    fn test_check_target_month() {
        assert!(check_target_month(None).is_ok());
        assert!(check_target_month(Some("2024-03")).is_ok());
        assert!(matches!(
            check_target_month(Some("2024-13")),
            Err(ApiError::Validation(_))
        ));
    }
}

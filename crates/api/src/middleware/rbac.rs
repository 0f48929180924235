//! Role gates for route groups.
//!
//! Run after `require_user_auth`; they read [`UserAuth`] from extensions.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::EmployeeRole;
use serde_json::json;

use crate::middleware::user_auth::{unauthorized_response, UserAuth};

/// Admin and HR.
pub const HR_ROLES: &[EmployeeRole] = &[EmployeeRole::Admin, EmployeeRole::Hr];

/// Admin, HR and line managers.
pub const MANAGEMENT_ROLES: &[EmployeeRole] =
    &[EmployeeRole::Admin, EmployeeRole::Hr, EmployeeRole::Manager];

pub async fn require_hr(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, HR_ROLES).await
}

pub async fn require_management(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, MANAGEMENT_ROLES).await
}

async fn require_role_impl(
    req: Request<Body>,
    next: Next,
    allowed: &'static [EmployeeRole],
) -> Response {
    let role = match req.extensions().get::<UserAuth>() {
        Some(auth) => auth.role,
        None => return unauthorized_response("Authentication required"),
    };

    if !role.is_one_of(allowed) {
        tracing::debug!(role = %role, path = %req.uri().path(), "Role not permitted");
        return forbidden_response(role);
    }

    next.run(req).await
}

fn forbidden_response(role: EmployeeRole) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": format!("Role '{}' is not allowed to access this resource", role)
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(role: Option<EmployeeRole>) -> Router {
        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_hr));

        match role {
            Some(role) => router.layer(axum::Extension(UserAuth {
                employee_id: Uuid::new_v4(),
                role,
                jti: "jti".into(),
            })),
            None => router,
        }
    }

    async fn status_for(role: Option<EmployeeRole>) -> StatusCode {
        app(role)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_require_hr_gates_roles() {
        assert_eq!(status_for(Some(EmployeeRole::Admin)).await, StatusCode::OK);
        assert_eq!(status_for(Some(EmployeeRole::Hr)).await, StatusCode::OK);
        assert_eq!(
            status_for(Some(EmployeeRole::Manager)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(Some(EmployeeRole::Employee)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_management_roles() {
        assert!(EmployeeRole::Manager.is_one_of(MANAGEMENT_ROLES));
        assert!(!EmployeeRole::Employee.is_one_of(MANAGEMENT_ROLES));
        assert!(!EmployeeRole::Manager.is_one_of(HR_ROLES));
    }
}

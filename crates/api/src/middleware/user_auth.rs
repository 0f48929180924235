//! Bearer JWT authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::EmployeeRole;
use serde_json::json;
use shared::jwt::{extract_employee_id, JwtConfig};
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Authenticated employee, taken from the access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Employee ID from the `sub` claim.
    pub employee_id: Uuid,
    /// Role from the `role` claim.
    pub role: EmployeeRole,
    /// JWT ID (jti) for log correlation.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and reads the employee id and role.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let employee_id =
            extract_employee_id(&claims).map_err(|_| "Invalid employee ID in token".to_string())?;
        let role = claims.role.parse::<EmployeeRole>()?;

        Ok(UserAuth {
            employee_id,
            role,
            jti: claims.jti,
        })
    }

    /// Builds the verifier from configuration.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, String> {
        JwtConfig::with_leeway(
            &config.private_key,
            &config.public_key,
            config.access_token_expiry_secs,
            config.leeway_secs,
        )
        .map_err(|e| format!("Failed to initialize JWT config: {}", e))
    }

    pub fn is_hr_or_admin(&self) -> bool {
        self.role.is_hr_or_admin()
    }

    pub fn is_self(&self, employee_id: Uuid) -> bool {
        self.employee_id == employee_id
    }

    /// `Forbidden` unless the caller holds one of `allowed`.
    pub fn require_any(&self, allowed: &[EmployeeRole]) -> Result<(), ApiError> {
        if self.role.is_one_of(allowed) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "Role '{}' is not allowed to perform this action",
                self.role
            )))
        }
    }
}

/// Reads the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a valid bearer token and stores [`UserAuth`] in
/// request extensions for the handlers.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Some(token) => token,
        None => return unauthorized_response("Missing or invalid Authorization header"),
    };

    let jwt_config = match state.jwt.as_deref() {
        Some(config) => config,
        None => {
            tracing::error!("JWT verifier not configured");
            return internal_error_response("Authentication service unavailable");
        }
    };

    match UserAuth::validate(jwt_config, token) {
        Ok(auth) => {
            tracing::debug!(employee_id = %auth.employee_id, role = %auth.role, "Authenticated");
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

pub(crate) fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

pub(crate) fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn test_jwt() -> JwtConfig {
        JwtConfig::new_for_testing("user-auth-test-secret-0123456789")
    }

    #[test]
    fn test_validate_reads_employee_and_role() {
        let jwt = test_jwt();
        let employee_id = Uuid::new_v4();
        let (token, jti) = jwt.generate_access_token(employee_id, "manager").unwrap();

        let auth = UserAuth::validate(&jwt, &token).unwrap();
        assert_eq!(auth.employee_id, employee_id);
        assert_eq!(auth.role, EmployeeRole::Manager);
        assert_eq!(auth.jti, jti);
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let jwt = test_jwt();
        let (token, _) = jwt.generate_access_token(Uuid::new_v4(), "janitor").unwrap();
        assert!(UserAuth::validate(&jwt, &token).is_err());
    }

    #[test]
    fn test_require_any() {
        let auth = UserAuth {
            employee_id: Uuid::new_v4(),
            role: EmployeeRole::Employee,
            jti: "jti".into(),
        };
        assert!(auth.require_any(&[EmployeeRole::Employee]).is_ok());
        assert!(matches!(
            auth.require_any(&[EmployeeRole::Admin, EmployeeRole::Hr]),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(
            unauthorized_response("nope").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            internal_error_response("down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

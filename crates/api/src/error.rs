use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error returned by every handler; rendered as `{error, message, details?}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body failed field validation.
    #[error("Validation error: {message}")]
    InvalidFields {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Validation(_) | ApiError::InvalidFields { .. } => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        let (message, details) = match self {
            ApiError::InvalidFields { message, details } => (message, Some(details)),
            ApiError::Internal(msg) => {
                // Never leak database or domain internals to clients
                tracing::error!(error = %msg, "Internal error");
                ("An internal error occurred".to_string(), None)
            }
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Validation(msg) => (msg, None),
        };

        (
            status,
            Json(ErrorBody {
                error,
                message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => ApiError::Conflict("Resource already exists".into()),
                Some("23503") => ApiError::NotFound("Referenced resource not found".into()),
                _ => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| ValidationDetail {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        let message = match details.as_slice() {
            [only] => only.message.clone(),
            _ => format!("{} validation errors", details.len()),
        };

        ApiError::InvalidFields { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_and_code_mapping() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "unauthorized"),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN, "forbidden"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT, "conflict"),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST, "validation_error"),
            (
                ApiError::InvalidFields {
                    message: "x".into(),
                    details: vec![],
                },
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_and_code(), (status, code), "{:?}", error);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::Forbidden("not your team".into()).to_string(),
            "Forbidden: not your team"
        );
        assert_eq!(
            ApiError::Validation("bad month".into()).to_string(),
            "Validation error: bad month"
        );
    }

    #[tokio::test]
    async fn test_conflict_body() {
        let (status, body) =
            body_json(ApiError::Conflict("Active target already exists".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
        assert_eq!(body["message"], "Active target already exists");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_message_is_masked() {
        let (status, body) =
            body_json(ApiError::Internal("connection refused on 10.0.0.5".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn test_invalid_fields_body_carries_details() {
        let (status, body) = body_json(ApiError::InvalidFields {
            message: "Invalid email".into(),
            details: vec![ValidationDetail {
                field: "email".into(),
                message: "Invalid email".into(),
            }],
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "email");
    }

    #[test]
    fn test_from_validation_errors_collects_details() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "Name is required"))]
            name: String,
            #[validate(range(min = 1, max = 10, message = "Out of range"))]
            count: i32,
        }

        let errors = Payload {
            name: String::new(),
            count: 0,
        }
        .validate()
        .unwrap_err();

        match ApiError::from(errors) {
            ApiError::InvalidFields { message, details } => {
                assert_eq!(message, "2 validation errors");
                assert_eq!(details[0].field, "count");
                assert_eq!(details[1].field, "name");
                assert_eq!(details[1].message, "Name is required");
            }
            other => panic!("Expected InvalidFields, got {:?}", other),
        }
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        match ApiError::from(sqlx::Error::RowNotFound) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_from_sqlx_other_is_internal() {
        let error = ApiError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, ApiError::Internal(_)));
    }
}

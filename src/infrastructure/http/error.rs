//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Conflict(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Internal(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.errno();
        let msg = self.message().to_string();

        match &self {
            ApiError::NotFound(_) => {
                tracing::warn!(errno = code, error = %msg, "Resource not found")
            }
            ApiError::BadRequest(_) => tracing::warn!(errno = code, error = %msg, "Bad request"),
            ApiError::Conflict(_) => {
                tracing::info!(errno = code, error = %msg, "Request superseded")
            }
            ApiError::Internal(_) => {
                tracing::error!(errno = code, error = %msg, "Internal server error")
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno = code, error = %msg, "Service unavailable")
            }
        }

        // 业务错误通过 errno 表达，HTTP 状态码保持 200
        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            superseded @ ApplicationError::Superseded { .. } => {
                ApiError::Conflict(superseded.to_string())
            }
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        let superseded: ApiError = ApplicationError::Superseded {
            key: "p".into(),
            token: 1,
            latest: 2,
        }
        .into();
        assert_eq!(superseded.errno(), errno::CONFLICT);

        let invalid: ApiError = ApplicationError::validation("bad").into();
        assert_eq!(invalid.errno(), errno::BAD_REQUEST);

        let tts: ApiError = ApplicationError::ExternalServiceError("down".into()).into();
        assert_eq!(tts.errno(), errno::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_error_envelope_keeps_http_200() {
        let response = ApiError::NotFound("Story not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errno"], 404);
        assert_eq!(json["error"], "Story not found");
        assert!(json["data"].is_null());
    }
}

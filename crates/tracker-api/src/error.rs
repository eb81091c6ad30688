//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트의 에러는 같은 JSON 형식으로 응답합니다.
//!
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "message": "Bug not found"
//! }
//! ```

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use tracker_core::TrackerError;

/// 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 상태 코드가 결정된 API 에러.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse::new(code, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
    }
}

/// 도메인 에러의 HTTP 상태 코드.
pub fn status_for(err: &TrackerError) -> StatusCode {
    match err {
        TrackerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TrackerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        TrackerError::Forbidden(_) => StatusCode::FORBIDDEN,
        TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
        TrackerError::DuplicateIdentity(_) => StatusCode::CONFLICT,
        TrackerError::Config(_) | TrackerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        let status = status_for(&err);
        if err.is_client_error() {
            return Self::new(status, err.code(), err.to_string());
        }
        // 내부 에러 상세는 로그에만 남긴다.
        error!(error = %err, "Request failed with internal error");
        Self::new(status, err.code(), "Internal server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 본문 파싱 실패를 400 + 표준 에러 본문으로 바꾸는 JSON 추출기.
///
/// axum 기본 `Json`은 타입 불일치에 422를 반환합니다.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TrackerError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (TrackerError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (TrackerError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (TrackerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (TrackerError::DuplicateIdentity("x".into()), StatusCode::CONFLICT),
            (
                TrackerError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = ApiError::from(TrackerError::Internal(
            "failed to write /var/data/users.json".into(),
        ));
        assert_eq!(err.body.code, "INTERNAL_ERROR");
        assert!(!err.body.message.contains("users.json"));
    }

    #[test]
    fn test_json_serialization() {
        let error = ApiErrorResponse::new("NOT_FOUND", "Project not found");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains(r#""message":"Project not found""#));
    }
}

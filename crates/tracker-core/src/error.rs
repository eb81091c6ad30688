//! 버그 트래커의 에러 타입.
//!
//! 이 모듈은 계정, 프로젝트, 버그 연산 전반에서 사용되는 에러 타입을 정의합니다.
//! HTTP 상태 코드로의 매핑은 API 계층이 담당합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// 필수 필드 누락 또는 잘못된 형식의 입력
    #[error("{0}")]
    InvalidInput(String),

    /// 토큰 누락/만료/위조, 또는 잘못된 자격증명
    #[error("{0}")]
    Unauthorized(String),

    /// 유효한 토큰이지만 역할이 맞지 않음
    #[error("{0}")]
    Forbidden(String),

    /// 참조된 엔티티가 존재하지 않음
    #[error("{0}")]
    NotFound(String),

    /// 이미 등록된 identity
    #[error("Identity already registered: {0}")]
    DuplicateIdentity(String),

    /// 설정 에러 (시작 시점에 감지)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 저장소/해싱/서명 실패
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 트래커 작업을 위한 Result 타입.
pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    /// 응답 본문에 실리는 기계 판독용 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            TrackerError::InvalidInput(_) => "INVALID_INPUT",
            TrackerError::Unauthorized(_) => "UNAUTHORIZED",
            TrackerError::Forbidden(_) => "FORBIDDEN",
            TrackerError::NotFound(_) => "NOT_FOUND",
            TrackerError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            TrackerError::Config(_) => "CONFIG_ERROR",
            TrackerError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 클라이언트 요청에 원인이 있는 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TrackerError::Config(_) | TrackerError::Internal(_))
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Internal(format!("serialization failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TrackerError::InvalidInput("x".into()).code(),
            "INVALID_INPUT"
        );
        assert_eq!(
            TrackerError::DuplicateIdentity("a@x.com".into()).code(),
            "DUPLICATE_IDENTITY"
        );
        assert_eq!(TrackerError::Internal("disk".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(TrackerError::NotFound("bug".into()).is_client_error());
        assert!(TrackerError::Forbidden("role".into()).is_client_error());
        assert!(!TrackerError::Internal("disk".into()).is_client_error());
        assert!(!TrackerError::Config("secret".into()).is_client_error());
    }

    #[test]
    fn test_duplicate_message_contains_identity() {
        let err = TrackerError::DuplicateIdentity("a@x.com".into());
        assert!(err.to_string().contains("a@x.com"));
    }
}

//! Axum용 인증 게이트.
//!
//! 요청마다 상태 없이 동작합니다:
//!
//! ```text
//! 헤더 없음            → 401
//! 헤더 있음 → 토큰 추출 → 검증 실패 → 401
//!                       → 검증 성공 → 역할 불일치 → 403
//!                                   → 통과 (Claims를 핸들러에 전달)
//! ```

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use tracker_core::Role;

use super::jwt::{Claims, JwtError, TokenIssuer};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 인증 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization token is required")]
    MissingToken,
    #[error("Authorization header must be 'Bearer <token>'")]
    InvalidAuthHeader,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token is invalid")]
    InvalidToken,
    #[error("This operation requires the {required} role")]
    InsufficientRole { required: Role, actual: Role },
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InsufficientRole { .. } => "FORBIDDEN",
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::SignatureInvalid => AuthError::InvalidSignature,
            JwtError::Malformed | JwtError::Encoding(_) | JwtError::ExpiryOutOfRange => AuthError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse::new(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}

/// `Authorization` 헤더 값에서 Bearer 토큰 추출.
pub fn extract_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// 역할이 정확히 일치하는지 확인.
pub fn require_role(required: Role, claims: &Claims) -> Result<(), AuthError> {
    if claims.role == required {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole {
            required,
            actual: claims.role,
        })
    }
}

/// 게이트 판정.
///
/// `header`는 `Authorization` 헤더의 원문, `required`는 작업에 필요한 역할.
pub fn authorize(
    header: Option<&str>,
    issuer: &TokenIssuer,
    required: Option<Role>,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = extract_bearer(header)?;
    let claims = issuer.verify_at(token, now).map_err(|e| {
        debug!(error = %e, "Token verification failed");
        AuthError::from(e)
    })?;

    if let Some(required) = required {
        require_role(required, &claims)?;
    }

    Ok(claims)
}

fn authorize_parts(
    parts: &Parts,
    state: &AppState,
    required: Option<Role>,
) -> Result<Claims, AuthError> {
    let header = match parts.headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?),
        None => None,
    };
    authorize(header, &state.tokens, required, Utc::now())
}

/// 인증된 요청 추출기 (역할 무관).
///
/// ```rust,ignore
/// async fn handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, None).map(JwtAuth)
    }
}

/// Member 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct MemberAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for MemberAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, Some(Role::Member)).map(MemberAuth)
    }
}

/// Tester 역할을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct TesterAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for TesterAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        authorize_parts(parts, state, Some(Role::Tester)).map(TesterAuth)
    }
}

/// 조회용 추출기.
///
/// `auth.public_reads`가 켜져 있으면 토큰이 없거나 잘못돼도 통과하고
/// (`None`), 꺼져 있으면 `JwtAuth`와 같습니다.
#[derive(Debug, Clone)]
pub struct ReadAuth(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for ReadAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match authorize_parts(parts, state, None) {
            Ok(claims) => Ok(ReadAuth(Some(claims))),
            Err(_) if state.public_reads => Ok(ReadAuth(None)),
            Err(e) => Err(e),
        }
    }
}

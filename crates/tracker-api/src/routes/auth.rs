//! 계정 등록 및 로그인 endpoint.
//!
//! 이 두 endpoint는 인증 게이트를 거치지 않습니다.
//!
//! - `POST /auth/register` - 계정 등록
//! - `POST /auth/login` - 로그인 (JWT 발급)

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use tracker_core::Role;

use super::MessageResponse;
use crate::error::{ApiErrorResponse, ApiJson, ApiResult};
use crate::state::AppState;

/// 계정 등록 요청.
///
/// `email`/`password` 필드 이름도 받습니다.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 계정 identity (대소문자 구분)
    #[serde(alias = "email")]
    pub identity: Option<String>,
    /// 비밀번호
    #[serde(alias = "password")]
    pub secret: Option<String>,
    /// 역할 (기본값: Member)
    pub role: Option<Role>,
}

/// 로그인 요청.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub identity: Option<String>,
    #[serde(alias = "password")]
    pub secret: Option<String>,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer 토큰
    pub token: String,
    /// 토큰에 담긴 역할
    pub role: Role,
    /// 만료까지 남은 시간(초)
    pub expires_in: i64,
}

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "등록 성공", body = MessageResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 identity", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let identity = req.identity.unwrap_or_default();
    let role = req.role.unwrap_or_default();
    debug!(identity = %identity, role = %role, "POST /auth/register");

    let account = state
        .accounts
        .register(&identity, req.secret.as_deref().unwrap_or_default(), role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "User {} registered as {}",
            account.identity, account.role
        ))),
    ))
}

/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 401, description = "자격 증명 불일치", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let identity = req.identity.unwrap_or_default();
    debug!(identity = %identity, "POST /auth/login");

    let outcome = state
        .accounts
        .login(&identity, req.secret.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(LoginResponse {
        token: outcome.token,
        role: outcome.role,
        expires_in: outcome.expires_in,
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

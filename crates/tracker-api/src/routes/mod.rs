//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 환영 메시지
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 저장소 상태 포함 헬스 체크 (readiness)
//! - `/auth` - 계정 등록, 로그인
//! - `/projects` - 프로젝트 관리, 테스터 추가
//! - `/projects/{project_id}/bugs` - 버그 보고, 담당자 지정, 해결

pub mod auth;
pub mod bugs;
pub mod health;
pub mod projects;

pub use auth::{auth_router, LoginRequest, LoginResponse, RegisterRequest};
pub use bugs::{
    bugs_router, AssignBugRequest, BugResponse, ReportBugRequest, ReportBugResponse,
    ResolveBugRequest,
};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use projects::{
    projects_router, AddTesterRequest, CreateProjectRequest, CreateProjectResponse,
    ProjectResponse,
};

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use tracker_core::TrackerError;

use crate::error::ApiResult;
use crate::state::AppState;

/// 환영 메시지.
pub const WELCOME_MESSAGE: &str = "Welcome to the Bug Management API";

/// 메시지만 담은 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "환영 메시지", body = String)),
    tag = "health"
)]
pub async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// 경로의 ID 파싱. UUID가 아니면 해당 리소스가 없는 것으로 봅니다.
pub(crate) fn parse_id(raw: &str, kind: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| TrackerError::NotFound(format!("{} {} not found", kind, raw)).into())
}

/// 필수 필드 확인.
pub(crate) fn required<T>(value: Option<T>, message: &str) -> ApiResult<T> {
    value.ok_or_else(|| TrackerError::InvalidInput(message.to_string()).into())
}

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(welcome))
        .nest("/health", health_router())
        .nest("/auth", auth_router())
        .nest("/projects", projects_router())
        .merge(bugs_router())
}

//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tracker_core::{Bug, BugStatus, Priority, Project, Role, Severity};

use crate::error::ApiErrorResponse;
use crate::routes::{
    AddTesterRequest, AssignBugRequest, BugResponse, ComponentHealth, ComponentStatus,
    CreateProjectRequest, CreateProjectResponse, HealthResponse, LoginRequest, LoginResponse,
    MessageResponse, ProjectResponse, RegisterRequest, ReportBugRequest, ReportBugResponse,
    ResolveBugRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// Bug Tracker API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bug Tracker API",
        version = "0.1.0",
        description = r#"
# 버그 트래커 REST API

프로젝트를 만들고 버그를 보고, 담당자를 지정하고, 해결 처리합니다.

## 인증

`POST /auth/login`으로 받은 토큰을 `Authorization: Bearer <token>` 헤더에
포함하세요.

| 작업 | 필요한 역할 |
|------|-------------|
| 프로젝트 생성/삭제, 테스터 추가 | Member |
| 버그 보고 | Tester |
| 담당자 지정, 해결 | 인증된 모든 역할 |
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 계정 등록 및 로그인"),
        (name = "projects", description = "프로젝트 - 생성, 조회, 삭제, 테스터 추가"),
        (name = "bugs", description = "버그 - 보고, 조회, 담당자 지정, 해결")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Auth =====
            Role,
            RegisterRequest,
            LoginRequest,
            LoginResponse,

            // ===== Projects =====
            Project,
            CreateProjectRequest,
            CreateProjectResponse,
            AddTesterRequest,
            ProjectResponse,

            // ===== Bugs =====
            Bug,
            Severity,
            Priority,
            BugStatus,
            ReportBugRequest,
            ReportBugResponse,
            AssignBugRequest,
            ResolveBugRequest,
            BugResponse,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::welcome,
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,

        // ===== Projects =====
        crate::routes::projects::create_project,
        crate::routes::projects::list_projects,
        crate::routes::projects::delete_project,
        crate::routes::projects::add_tester,

        // ===== Bugs =====
        crate::routes::bugs::report_bug,
        crate::routes::bugs::list_bugs,
        crate::routes::bugs::assign_bug,
        crate::routes::bugs::resolve_bug,
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("POST /auth/login 으로 발급받은 토큰"))
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

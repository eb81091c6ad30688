//! 버그 트래커 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - Argon2 비밀번호 해싱과 JWT 인증, 역할 게이트
//! - 메모리/JSON 파일 저장소
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`services`]: 계정, 프로젝트, 버그 서비스
//! - [`repository`]: 영속성 계층
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{hash_password, verify_password, Claims, JwtAuth, MemberAuth, TesterAuth, TokenIssuer};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use repository::{open_repository, JsonFileRepository, MemoryRepository, TrackerRepository};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;

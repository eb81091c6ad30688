//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 Axum의 State extractor를 통해 핸들러와
//! 인증 추출기에 주입됩니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use tracker_core::{AppConfig, TrackerResult};

use crate::auth::TokenIssuer;
use crate::repository::TrackerRepository;
use crate::services::{AccountService, BugService, ProjectService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 영속성 백엔드 (메모리 또는 JSON 파일)
    pub repository: Arc<dyn TrackerRepository>,

    /// JWT 발급/검증기
    pub tokens: Arc<TokenIssuer>,

    /// 목록 조회에 토큰이 없어도 허용할지 여부
    pub public_reads: bool,

    /// 계정 등록/로그인
    pub accounts: AccountService,

    /// 프로젝트 CRUD
    pub projects: ProjectService,

    /// 버그 보고/해결
    pub bugs: BugService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소와 토큰 발급기로 상태 생성. 조회는 기본적으로 공개됩니다.
    pub fn new(repository: Arc<dyn TrackerRepository>, tokens: TokenIssuer) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            accounts: AccountService::new(repository.clone(), tokens.clone()),
            projects: ProjectService::new(repository.clone()),
            bugs: BugService::new(repository.clone()),
            repository,
            tokens,
            public_reads: true,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 설정으로부터 상태 생성. 서명 키가 없으면 실패합니다.
    pub fn from_config(
        config: &AppConfig,
        repository: Arc<dyn TrackerRepository>,
    ) -> TrackerResult<Self> {
        let tokens = TokenIssuer::from_config(&config.auth)?;
        Ok(Self::new(repository, tokens).with_public_reads(config.auth.public_reads))
    }

    pub fn with_public_reads(mut self, public_reads: bool) -> Self {
        self.public_reads = public_reads;
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }

    /// 저장소 상태 확인.
    pub async fn is_repository_healthy(&self) -> bool {
        match self.repository.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.repository.backend_name(), error = %e, "Repository health check failed");
                false
            }
        }
    }
}

/// 테스트용 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성 (메모리 저장소, 1시간 토큰).
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;

    let tokens = TokenIssuer::new(
        &SecretString::new(TEST_JWT_SECRET.into()),
        chrono::Duration::hours(1),
    );
    AppState::new(Arc::new(crate::repository::MemoryRepository::new()), tokens)
}

//! 영속성 계층.
//!
//! 서비스는 [`TrackerRepository`] 트레이트에만 의존하며 구현체는 시작 시
//! 설정에 따라 주입됩니다:
//!
//! - [`MemoryRepository`]: 프로세스 메모리 (테스트, 개발용)
//! - [`JsonFileRepository`]: 데이터 디렉토리의 JSON 파일
//!
//! 각 메서드 호출이 하나의 작업 단위입니다. 중복 검사와 참조 검사는
//! 구현체 내부에서 쓰기와 원자적으로 수행됩니다.

mod collections;
mod json_file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use tracker_core::{Account, Bug, BugUpdate, Project, StorageBackend, StorageConfig, TrackerError};

pub use collections::{Collection, Collections};
pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("identity already registered: {0}")]
    DuplicateIdentity(String),

    #[error("project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt data file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}

impl From<RepositoryError> for TrackerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateIdentity(identity) => TrackerError::DuplicateIdentity(identity),
            RepositoryError::ProjectNotFound(id) => {
                TrackerError::NotFound(format!("Project {} not found", id))
            }
            other => TrackerError::Internal(other.to_string()),
        }
    }
}

/// 계정, 프로젝트, 버그 저장소.
#[async_trait]
pub trait TrackerRepository: Send + Sync {
    /// 계정 추가. 같은 identity가 있으면 `DuplicateIdentity`.
    async fn insert_account(&self, account: Account) -> Result<(), RepositoryError>;

    async fn find_account(&self, identity: &str) -> Result<Option<Account>, RepositoryError>;

    async fn insert_project(&self, project: Project) -> Result<(), RepositoryError>;

    /// 전체 프로젝트 (생성 순서).
    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError>;

    /// 삭제되었으면 `true`.
    async fn delete_project(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// 팀 멤버 추가 후 프로젝트 반환. 프로젝트가 없으면 `None`.
    async fn add_team_member(
        &self,
        id: Uuid,
        member: &str,
    ) -> Result<Option<Project>, RepositoryError>;

    /// 버그 추가. 프로젝트가 없으면 `ProjectNotFound`.
    async fn insert_bug(&self, bug: Bug) -> Result<(), RepositoryError>;

    async fn list_bugs(&self, project_id: Uuid) -> Result<Vec<Bug>, RepositoryError>;

    /// (프로젝트, 버그) 쌍에 변경 적용. 쌍이 일치하지 않으면 `None`.
    async fn update_bug(
        &self,
        project_id: Uuid,
        bug_id: Uuid,
        update: BugUpdate,
    ) -> Result<Option<Bug>, RepositoryError>;

    /// 저장소 접근 가능 여부.
    async fn health_check(&self) -> Result<(), RepositoryError>;

    /// 헬스 체크 응답에 표시할 백엔드 이름.
    fn backend_name(&self) -> &'static str;
}

/// 설정에 맞는 저장소 생성.
pub async fn open_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn TrackerRepository>, RepositoryError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryRepository::new())),
        StorageBackend::File => Ok(Arc::new(JsonFileRepository::open(&config.data_dir).await?)),
    }
}

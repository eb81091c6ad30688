//! 메모리 저장소.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use tracker_core::{Account, Bug, BugUpdate, Project};

use super::{Collections, RepositoryError, TrackerRepository};

/// 프로세스 메모리에 보관하는 저장소. 재시작하면 비워집니다.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    data: RwLock<Collections>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackerRepository for MemoryRepository {
    async fn insert_account(&self, account: Account) -> Result<(), RepositoryError> {
        self.data.write().await.insert_account(account)?;
        Ok(())
    }

    async fn find_account(&self, identity: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.data.read().await.find_account(identity).cloned())
    }

    async fn insert_project(&self, project: Project) -> Result<(), RepositoryError> {
        self.data.write().await.insert_project(project);
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.data.read().await.projects.clone())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.data.read().await.find_project(id).cloned())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.data.write().await.delete_project(id).is_some())
    }

    async fn add_team_member(
        &self,
        id: Uuid,
        member: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        Ok(self
            .data
            .write()
            .await
            .add_team_member(id, member)
            .map(|(project, _)| project))
    }

    async fn insert_bug(&self, bug: Bug) -> Result<(), RepositoryError> {
        self.data.write().await.insert_bug(bug)?;
        Ok(())
    }

    async fn list_bugs(&self, project_id: Uuid) -> Result<Vec<Bug>, RepositoryError> {
        Ok(self.data.read().await.bugs_for(project_id))
    }

    async fn update_bug(
        &self,
        project_id: Uuid,
        bug_id: Uuid,
        update: BugUpdate,
    ) -> Result<Option<Bug>, RepositoryError> {
        Ok(self.data.write().await.update_bug(project_id, bug_id, update))
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

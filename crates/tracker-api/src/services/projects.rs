//! 프로젝트 서비스.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tracker_core::{NewProject, Project, TrackerError, TrackerResult};

use crate::repository::TrackerRepository;

fn project_not_found(id: Uuid) -> TrackerError {
    TrackerError::NotFound(format!("Project {} not found", id))
}

/// 프로젝트 CRUD.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn TrackerRepository>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn TrackerRepository>) -> Self {
        Self { repository }
    }

    /// 프로젝트 생성. `created_by`는 요청자 identity.
    pub async fn create(&self, input: NewProject, created_by: &str) -> TrackerResult<Project> {
        input.validate()?;

        let project = Project::new(input, created_by);
        self.repository.insert_project(project.clone()).await?;

        info!(project_id = %project.id, name = %project.name, created_by, "Project created");
        Ok(project)
    }

    pub async fn list(&self) -> TrackerResult<Vec<Project>> {
        Ok(self.repository.list_projects().await?)
    }

    /// 프로젝트 삭제. 소속 버그는 그대로 남습니다.
    pub async fn delete(&self, id: Uuid) -> TrackerResult<()> {
        if !self.repository.delete_project(id).await? {
            return Err(project_not_found(id));
        }
        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// 테스터를 팀 멤버로 추가. 이미 멤버면 그대로 반환합니다.
    pub async fn add_tester(&self, id: Uuid, tester_email: &str) -> TrackerResult<Project> {
        let tester_email = tester_email.trim();
        if tester_email.is_empty() {
            return Err(TrackerError::InvalidInput(
                "Tester email is required".to_string(),
            ));
        }

        let project = self
            .repository
            .add_team_member(id, tester_email)
            .await?
            .ok_or_else(|| project_not_found(id))?;

        info!(project_id = %id, tester = tester_email, "Tester added to project");
        Ok(project)
    }
}

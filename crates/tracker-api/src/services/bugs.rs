//! 버그 서비스.
//!
//! 버그 상태 흐름:
//!
//! ```text
//! report ──▶ Open ──resolve──▶ Resolved
//!             │                   ▲
//!             └── InProgress ─────┘
//! ```
//!
//! `assign`은 상태를 바꾸지 않고 담당자만 지정합니다.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tracker_core::{Bug, BugUpdate, NewBug, TrackerError, TrackerResult, RESOLVED_STATUS};

use crate::repository::TrackerRepository;

fn bug_not_found(project_id: Uuid, bug_id: Uuid) -> TrackerError {
    TrackerError::NotFound(format!(
        "Bug {} not found in project {}",
        bug_id, project_id
    ))
}

/// 버그 보고, 조회, 담당자 지정, 해결.
#[derive(Clone)]
pub struct BugService {
    repository: Arc<dyn TrackerRepository>,
}

impl BugService {
    pub fn new(repository: Arc<dyn TrackerRepository>) -> Self {
        Self { repository }
    }

    /// 버그 보고.
    ///
    /// 프로젝트 존재 확인은 저장소가 삽입과 같은 잠금 구간에서 수행합니다.
    pub async fn report(&self, project_id: Uuid, input: NewBug) -> TrackerResult<Bug> {
        input.validate()?;

        let bug = Bug::new(project_id, input);
        self.repository.insert_bug(bug.clone()).await?;

        info!(
            project_id = %project_id,
            bug_id = %bug.id,
            severity = ?bug.severity,
            "Bug reported"
        );
        Ok(bug)
    }

    /// 프로젝트의 버그 목록. 없는 프로젝트면 빈 목록.
    pub async fn list(&self, project_id: Uuid) -> TrackerResult<Vec<Bug>> {
        Ok(self.repository.list_bugs(project_id).await?)
    }

    pub async fn assign(&self, project_id: Uuid, bug_id: Uuid, assignee: &str) -> TrackerResult<Bug> {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid assignment data: assignee is required".to_string(),
            ));
        }

        let bug = self
            .repository
            .update_bug(
                project_id,
                bug_id,
                BugUpdate::Assign {
                    assignee: assignee.to_string(),
                },
            )
            .await?
            .ok_or_else(|| bug_not_found(project_id, bug_id))?;

        info!(bug_id = %bug_id, assignee, "Bug assigned");
        Ok(bug)
    }

    /// 버그 해결.
    ///
    /// `status`는 정확히 `"Resolved"`여야 합니다. 다른 전이는 노출하지 않습니다.
    pub async fn resolve(
        &self,
        project_id: Uuid,
        bug_id: Uuid,
        status: &str,
        commit_link: Option<String>,
    ) -> TrackerResult<Bug> {
        if status != RESOLVED_STATUS {
            return Err(TrackerError::InvalidInput(format!(
                "Invalid status value, should be \"{}\"",
                RESOLVED_STATUS
            )));
        }

        let commit_link = commit_link.filter(|link| !link.trim().is_empty());
        let bug = self
            .repository
            .update_bug(project_id, bug_id, BugUpdate::Resolve { commit_link })
            .await?
            .ok_or_else(|| bug_not_found(project_id, bug_id))?;

        info!(bug_id = %bug_id, "Bug resolved");
        Ok(bug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use tracker_core::{BugStatus, NewProject, Priority, Project, Severity};

    async fn setup() -> (BugService, Uuid) {
        let repo: Arc<dyn TrackerRepository> = Arc::new(MemoryRepository::new());
        let project = Project::new(
            NewProject {
                name: "Bug Tracking Application".to_string(),
                repository_url: "https://github.com/example/bugs".to_string(),
                team_members: vec![],
            },
            "m@x.com",
        );
        let pid = project.id;
        repo.insert_project(project).await.unwrap();
        (BugService::new(repo), pid)
    }

    fn new_bug(title: &str) -> NewBug {
        NewBug {
            title: title.to_string(),
            description: Some("Clicking submit does nothing".to_string()),
            severity: Severity::High,
            priority: Priority::Medium,
            commit_link: None,
        }
    }

    #[tokio::test]
    async fn test_report_and_list() {
        let (svc, pid) = setup().await;
        let bug = svc.report(pid, new_bug("Login Issue")).await.unwrap();
        assert_eq!(bug.status, BugStatus::Open);

        let bugs = svc.list(pid).await.unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].id, bug.id);

        assert!(svc.list(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_on_missing_project() {
        let (svc, _) = setup().await;
        let err = svc.report(Uuid::new_v4(), new_bug("Orphan")).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_report_requires_title() {
        let (svc, pid) = setup().await;
        let err = svc.report(pid, new_bug("   ")).await.unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_resolve_requires_resolved_literal() {
        let (svc, pid) = setup().await;
        let bug = svc.report(pid, new_bug("Crash")).await.unwrap();

        let err = svc
            .resolve(pid, bug.id, "InProgress", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert!(matches!(
            svc.resolve(pid, bug.id, "resolved", None).await,
            Err(TrackerError::InvalidInput(_))
        ));

        let resolved = svc
            .resolve(pid, bug.id, "Resolved", Some("https://git/commit/abc".to_string()))
            .await
            .unwrap();
        assert_eq!(resolved.status, BugStatus::Resolved);
        assert_eq!(resolved.commit_link.as_deref(), Some("https://git/commit/abc"));

        let stored = svc.list(pid).await.unwrap();
        assert_eq!(stored[0].status, BugStatus::Resolved);
    }

    #[tokio::test]
    async fn test_assign() {
        let (svc, pid) = setup().await;
        let bug = svc.report(pid, new_bug("Crash")).await.unwrap();

        let assigned = svc.assign(pid, bug.id, "dev@x.com").await.unwrap();
        assert_eq!(assigned.assignee.as_deref(), Some("dev@x.com"));
        assert_eq!(assigned.status, BugStatus::Open);

        assert!(matches!(
            svc.assign(pid, bug.id, "").await,
            Err(TrackerError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_assign_missing_bug() {
        let (svc, pid) = setup().await;
        let err = svc.assign(pid, Uuid::new_v4(), "dev@x.com").await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));

        // 다른 프로젝트의 버그 ID도 NotFound
        let bug = svc.report(pid, new_bug("Crash")).await.unwrap();
        let err = svc
            .assign(Uuid::new_v4(), bug.id, "dev@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }
}

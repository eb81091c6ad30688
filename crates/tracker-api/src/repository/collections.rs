//! 저장소 어댑터들이 공유하는 컬렉션 연산.
//!
//! 모든 메서드는 동기이며 호출자가 잡은 잠금 안에서 실행됩니다.
//! 검사와 쓰기가 같은 잠금 구간에 있으므로 identity 중복과 버그→프로젝트
//! 참조 무결성이 동시 요청에서도 유지됩니다.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tracker_core::{Account, Bug, BugUpdate, Project};

use super::RepositoryError;

/// 변경된 컬렉션. 파일 저장소는 해당 파일만 다시 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Projects,
    Bugs,
}

impl Collection {
    /// 파일 백엔드에서의 파일 이름.
    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Users => "users.json",
            Collection::Projects => "projects.json",
            Collection::Bugs => "bugs.json",
        }
    }
}

/// 엔티티별 레코드 목록.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collections {
    pub users: Vec<Account>,
    pub projects: Vec<Project>,
    pub bugs: Vec<Bug>,
}

impl Collections {
    pub fn insert_account(&mut self, account: Account) -> Result<Collection, RepositoryError> {
        if self.users.iter().any(|a| a.identity == account.identity) {
            return Err(RepositoryError::DuplicateIdentity(account.identity));
        }
        self.users.push(account);
        Ok(Collection::Users)
    }

    pub fn find_account(&self, identity: &str) -> Option<&Account> {
        self.users.iter().find(|a| a.identity == identity)
    }

    pub fn insert_project(&mut self, project: Project) -> Collection {
        self.projects.push(project);
        Collection::Projects
    }

    pub fn find_project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// 프로젝트 삭제. 소속 버그는 남겨 둡니다.
    pub fn delete_project(&mut self, id: Uuid) -> Option<Collection> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        (self.projects.len() != before).then_some(Collection::Projects)
    }

    pub fn add_team_member(&mut self, id: Uuid, member: &str) -> Option<(Project, bool)> {
        let project = self.projects.iter_mut().find(|p| p.id == id)?;
        let added = project.add_member(member);
        Some((project.clone(), added))
    }

    pub fn insert_bug(&mut self, bug: Bug) -> Result<Collection, RepositoryError> {
        if self.find_project(bug.project_id).is_none() {
            return Err(RepositoryError::ProjectNotFound(bug.project_id));
        }
        self.bugs.push(bug);
        Ok(Collection::Bugs)
    }

    pub fn bugs_for(&self, project_id: Uuid) -> Vec<Bug> {
        self.bugs
            .iter()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect()
    }

    /// (프로젝트, 버그) 쌍이 일치하는 버그에 변경 적용.
    pub fn update_bug(&mut self, project_id: Uuid, bug_id: Uuid, update: BugUpdate) -> Option<Bug> {
        let bug = self
            .bugs
            .iter_mut()
            .find(|b| b.id == bug_id && b.project_id == project_id)?;
        bug.apply(update);
        Some(bug.clone())
    }
}

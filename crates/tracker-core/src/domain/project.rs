//! 프로젝트 엔티티.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};

/// 프로젝트.
///
/// 버그는 `id`로 프로젝트를 참조하지만 프로젝트가 버그를 소유하지는 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// 생성 시 발급되는 고유 ID
    pub id: Uuid,
    /// 프로젝트 이름
    pub name: String,
    /// 저장소 URL
    pub repository_url: String,
    /// 팀 멤버 identity 목록 (순서 유지)
    pub team_members: Vec<String>,
    /// 생성한 계정의 identity
    pub created_by: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
}

/// 새 프로젝트 입력.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub repository_url: String,
    pub team_members: Vec<String>,
}

impl NewProject {
    /// 필수 필드 검증.
    ///
    /// 이름과 저장소 URL은 공백만으로 이루어질 수 없습니다.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid project data: name is required".to_string(),
            ));
        }
        if self.repository_url.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid project data: repositoryUrl is required".to_string(),
            ));
        }
        if self.team_members.iter().any(|m| m.trim().is_empty()) {
            return Err(TrackerError::InvalidInput(
                "Invalid project data: teamMembers must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }
}

impl Project {
    /// 검증된 입력으로 프로젝트 생성.
    pub fn new(input: NewProject, created_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            repository_url: input.repository_url,
            team_members: input.team_members,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    /// 팀 멤버 추가. 이미 있으면 `false`.
    pub fn add_member(&mut self, member: impl Into<String>) -> bool {
        let member = member.into();
        if self.team_members.contains(&member) {
            return false;
        }
        self.team_members.push(member);
        true
    }
}

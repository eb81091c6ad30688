//! 버그 엔티티 및 상태.
//!
//! - `Severity` - 심각도
//! - `Priority` - 우선순위
//! - `BugStatus` - 처리 상태 (Open → Resolved)
//! - `Bug` - 프로젝트에 보고된 버그

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};

/// 해결 요청에서 허용되는 유일한 상태 문자열.
pub const RESOLVED_STATUS: &str = "Resolved";

/// 버그 심각도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// 버그 우선순위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// 버그 처리 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum BugStatus {
    /// 보고됨 (초기 상태)
    #[default]
    Open,
    /// 처리 중
    #[serde(alias = "In Progress")]
    InProgress,
    /// 해결됨
    Resolved,
}

impl std::fmt::Display for BugStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BugStatus::Open => write!(f, "Open"),
            BugStatus::InProgress => write!(f, "InProgress"),
            BugStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

/// 보고된 버그.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// 고유 ID
    pub id: Uuid,
    /// 소속 프로젝트 ID (생성 시점에 존재해야 함)
    pub project_id: Uuid,
    /// 제목
    pub title: String,
    /// 상세 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 심각도
    pub severity: Severity,
    /// 우선순위
    pub priority: Priority,
    /// 처리 상태
    pub status: BugStatus,
    /// 관련 커밋 링크
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_link: Option<String>,
    /// 담당자 identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// 보고 시각
    pub created_at: DateTime<Utc>,
    /// 마지막 변경 시각
    pub updated_at: DateTime<Utc>,
}

/// 새 버그 입력.
#[derive(Debug, Clone)]
pub struct NewBug {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub priority: Priority,
    pub commit_link: Option<String>,
}

impl NewBug {
    /// 제목 검증.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid bug data: title is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// 기존 버그에 적용할 변경.
///
/// 저장소는 이 변경을 버그 조회와 같은 잠금 구간에서 적용합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum BugUpdate {
    /// 담당자 지정
    Assign { assignee: String },
    /// 해결 처리 (커밋 링크가 주어지면 함께 기록)
    Resolve { commit_link: Option<String> },
}

impl Bug {
    /// `Open` 상태의 새 버그 생성.
    pub fn new(project_id: Uuid, input: NewBug) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: input.title,
            description: input.description,
            severity: input.severity,
            priority: input.priority,
            status: BugStatus::Open,
            commit_link: input.commit_link,
            assignee: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 변경 적용.
    pub fn apply(&mut self, update: BugUpdate) {
        match update {
            BugUpdate::Assign { assignee } => {
                self.assignee = Some(assignee);
            }
            BugUpdate::Resolve { commit_link } => {
                self.status = BugStatus::Resolved;
                if commit_link.is_some() {
                    self.commit_link = commit_link;
                }
            }
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bug() -> Bug {
        Bug::new(
            Uuid::new_v4(),
            NewBug {
                title: "Login Issue".to_string(),
                description: None,
                severity: Severity::High,
                priority: Priority::Medium,
                commit_link: Some("https://git/commit/1".to_string()),
            },
        )
    }

    #[test]
    fn test_new_bug_is_open() {
        let bug = new_bug();
        assert_eq!(bug.status, BugStatus::Open);
        assert!(bug.assignee.is_none());
    }

    #[test]
    fn test_resolve_from_any_state() {
        for initial in [BugStatus::Open, BugStatus::InProgress, BugStatus::Resolved] {
            let mut bug = new_bug();
            bug.status = initial;
            bug.apply(BugUpdate::Resolve { commit_link: None });
            assert_eq!(bug.status, BugStatus::Resolved);
        }
    }

    #[test]
    fn test_resolve_keeps_link_when_absent() {
        let mut bug = new_bug();
        bug.apply(BugUpdate::Resolve { commit_link: None });
        assert_eq!(bug.commit_link.as_deref(), Some("https://git/commit/1"));

        bug.apply(BugUpdate::Resolve {
            commit_link: Some("https://git/commit/2".to_string()),
        });
        assert_eq!(bug.commit_link.as_deref(), Some("https://git/commit/2"));
    }

    #[test]
    fn test_assign_sets_assignee() {
        let mut bug = new_bug();
        bug.apply(BugUpdate::Assign {
            assignee: "dev@x.com".to_string(),
        });
        assert_eq!(bug.assignee.as_deref(), Some("dev@x.com"));
        assert_eq!(bug.status, BugStatus::Open);
    }

    #[test]
    fn test_status_accepts_spaced_alias() {
        let status: BugStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, BugStatus::InProgress);
    }

    #[test]
    fn test_blank_title_rejected() {
        let input = NewBug {
            title: " ".to_string(),
            description: None,
            severity: Severity::Low,
            priority: Priority::Low,
            commit_link: None,
        };
        assert!(matches!(input.validate(), Err(TrackerError::InvalidInput(_))));
    }
}

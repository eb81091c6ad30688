//! 사용자 역할.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// 각 작업에 필요한 역할과 정확히 일치해야 접근이 허용됩니다.
/// 역할 간 상하 관계는 없습니다. 역직렬화는 [`Role::parse`]를 거칩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 팀 멤버 - 프로젝트 생성/삭제, 테스터 추가
    #[default]
    Member,
    /// 테스터 - 버그 보고
    Tester,
}

impl Role {
    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "member" => Some(Role::Member),
            "tester" => Some(Role::Tester),
            _ => None,
        }
    }

    /// 직렬화 형식과 같은 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Tester => "Tester",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or_else(|| format!("unknown role: {}", value))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! 계정 엔티티.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// 등록된 계정.
///
/// 생성 이후 변경되지 않습니다. `secret_hash`는 PHC 형식 해시이며
/// 저장소에만 기록되고 API 응답에는 절대 포함되지 않습니다.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// 고유 식별자 (대소문자 구분, 보통 이메일)
    pub identity: String,
    /// 솔트가 포함된 비밀번호 해시
    pub secret_hash: String,
    /// 역할
    pub role: Role,
    /// 등록 시각
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// 새 계정 생성.
    pub fn new(identity: impl Into<String>, secret_hash: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            secret_hash: secret_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

// 해시가 로그로 새지 않도록 Debug 출력에서 가린다.
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("identity", &self.identity)
            .field("secret_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

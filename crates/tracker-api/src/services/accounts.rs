//! 계정 등록 및 로그인.

use std::sync::Arc;

use tracing::{info, warn};

use tracker_core::{Account, Role, TrackerError, TrackerResult};

use crate::auth::{hash_password, verify_password, TokenIssuer};
use crate::repository::TrackerRepository;

/// 로그인 실패 메시지. 계정 존재 여부를 드러내지 않도록 하나로 통일합니다.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// 로그인 결과.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    /// 토큰 유효 시간(초)
    pub expires_in: i64,
}

/// 계정 서비스.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn TrackerRepository>,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn TrackerRepository>, tokens: Arc<TokenIssuer>) -> Self {
        Self { repository, tokens }
    }

    /// 새 계정 등록.
    ///
    /// 해싱 전에 중복을 한 번 확인하지만, 최종 판정은 저장소의 원자적
    /// 삽입이 내립니다. 동시에 같은 identity로 등록하면 한 쪽만 성공합니다.
    pub async fn register(&self, identity: &str, secret: &str, role: Role) -> TrackerResult<Account> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid registration data: identity is required".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid registration data: secret is required".to_string(),
            ));
        }

        if self.repository.find_account(identity).await?.is_some() {
            return Err(TrackerError::DuplicateIdentity(identity.to_string()));
        }

        let secret = secret.to_owned();
        let secret_hash = tokio::task::spawn_blocking(move || hash_password(&secret))
            .await
            .map_err(|e| TrackerError::Internal(format!("hashing task failed: {}", e)))??;

        let account = Account::new(identity, secret_hash, role);
        self.repository.insert_account(account.clone()).await?;

        info!(identity = %account.identity, role = %account.role, "Account registered");
        Ok(account)
    }

    /// 자격 증명 확인 후 토큰 발급.
    pub async fn login(&self, identity: &str, secret: &str) -> TrackerResult<LoginOutcome> {
        if identity.trim().is_empty() || secret.is_empty() {
            return Err(TrackerError::InvalidInput(
                "Invalid login data: identity and secret are required".to_string(),
            ));
        }

        let Some(account) = self.repository.find_account(identity.trim()).await? else {
            warn!(identity = %identity, "Login for unknown identity");
            return Err(TrackerError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let secret = secret.to_owned();
        let stored = account.secret_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&secret, &stored))
            .await
            .map_err(|e| TrackerError::Internal(format!("verification task failed: {}", e)))??;

        if !matches {
            warn!(identity = %account.identity, "Login with wrong secret");
            return Err(TrackerError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .tokens
            .issue(&account.identity, account.role)
            .map_err(|e| TrackerError::Internal(e.to_string()))?;

        info!(identity = %account.identity, "Login succeeded");
        Ok(LoginOutcome {
            token,
            role: account.role,
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }
}

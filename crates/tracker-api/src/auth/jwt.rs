//! JWT 토큰 발급 및 검증.
//!
//! 토큰은 HS256으로 서명되며 서버에 저장되지 않습니다.
//! 만료 검사는 호출자가 넘긴 시각을 기준으로 수행하므로 테스트에서 시계를
//! 조작할 수 있습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tracker_core::{AuthConfig, Role, TrackerResult};

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 계정 identity
    pub sub: String,
    /// 계정 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

impl Claims {
    fn new(
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(JwtError::ExpiryOutOfRange)?;
        Ok(Self {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// 주어진 시각 기준 만료 여부. `exp` 시각 자체도 만료로 봅니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature is invalid")]
    SignatureInvalid,
}

/// 토큰 발급/검증기.
///
/// 프로세스 전역 서명 키 하나로 생성되며 `AppState`를 통해 주입됩니다.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// 서명 키와 유효 시간으로 생성.
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// 인증 설정에서 생성. 서명 키나 유효 시간이 잘못되면 설정 에러.
    pub fn from_config(auth: &AuthConfig) -> TrackerResult<Self> {
        let secret = auth.require_secret()?;
        Ok(Self::new(secret, auth.token_ttl()?))
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 현재 시각 기준으로 토큰 발급.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, JwtError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// 지정 시각 기준으로 토큰 발급.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject, role, now, self.ttl)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(JwtError::Encoding)
    }

    /// 현재 시각 기준으로 토큰 검증.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// 지정 시각 기준으로 토큰 검증.
    ///
    /// 서명을 먼저 확인한 뒤 만료를 확인합니다.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp는 아래에서 `now` 기준으로 직접 검사한다.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::SignatureInvalid
                }
                _ => JwtError::Malformed,
            }
        })?;

        if data.claims.is_expired_at(now) {
            return Err(JwtError::Expired);
        }

        Ok(data.claims)
    }
}

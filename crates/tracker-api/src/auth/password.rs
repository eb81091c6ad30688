//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 해싱 및 검증. 솔트는 호출마다 새로 생성되어 PHC 문자열에
//! 포함되므로 별도로 저장하지 않습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use tracker_core::TrackerError;

/// 비밀번호 처리 에러.
///
/// 불일치는 에러가 아니라 `verify_password`의 `false` 결과입니다.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
    #[error("stored password hash is malformed")]
    InvalidHashFormat,
    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

impl From<PasswordError> for TrackerError {
    fn from(err: PasswordError) -> Self {
        TrackerError::Internal(err.to_string())
    }
}

/// 비밀번호 해싱.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함)
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password")?;
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 비교는 argon2 크레이트의 상수 시간 비교를 사용합니다.
///
/// # Returns
///
/// 일치하면 `Ok(true)`, 불일치하면 `Ok(false)`.
/// 저장된 해시가 깨져 있으면 에러.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}

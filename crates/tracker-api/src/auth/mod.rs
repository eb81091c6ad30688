//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`hash_password`] / [`verify_password`]: Argon2id 비밀번호 해싱
//! - [`TokenIssuer`]: JWT 발급/검증 (HS256)
//! - [`authorize`]: 헤더 → 토큰 → 역할 판정
//! - [`JwtAuth`], [`MemberAuth`], [`TesterAuth`], [`ReadAuth`]: Axum 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn create_project(
//!     MemberAuth(claims): MemberAuth,
//!     ApiJson(req): ApiJson<CreateProjectRequest>,
//! ) -> ApiResult<impl IntoResponse> {
//!     // claims.role == Role::Member 보장
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtError, TokenIssuer};
pub use middleware::{
    authorize, extract_bearer, require_role, AuthError, JwtAuth, MemberAuth, ReadAuth, TesterAuth,
};
pub use password::{hash_password, verify_password, PasswordError};

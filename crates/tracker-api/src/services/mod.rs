//! 리소스 서비스 모듈.
//!
//! 핸들러는 요청을 검증된 입력으로 바꾼 뒤 서비스를 호출합니다.
//! 서비스는 저장소 트레이트에만 의존하므로 백엔드와 무관하게 테스트할 수
//! 있습니다.

pub mod accounts;
pub mod bugs;
pub mod projects;

pub use accounts::{AccountService, LoginOutcome};
pub use bugs::BugService;
pub use projects::ProjectService;

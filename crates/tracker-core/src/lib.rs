//! # Tracker Core
//!
//! 버그 트래커의 핵심 도메인 모델 및 공통 인프라를 제공합니다:
//! - 계정, 역할
//! - 프로젝트, 버그 및 버그 상태 전이
//! - 도메인 에러 타입
//! - 설정 로딩
//! - 로깅 초기화

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;

//! 버그 트래커의 도메인 모델.

mod account;
mod bug;
mod project;
mod role;

pub use account::*;
pub use bug::*;
pub use project::*;
pub use role::*;

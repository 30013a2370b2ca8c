//! 에러 처리 모듈
//!
//! [`AppError`](errors::AppError)와 HTTP 상태 코드 매핑을 제공합니다.

pub mod errors;

pub use errors::*;

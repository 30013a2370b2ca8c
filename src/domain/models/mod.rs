//! # Domain Models Module
//!
//! 저장되지 않는 도메인 모델입니다.
//!
//! - [`auth`]: 요청에 부착되는 인증 사용자, 미들웨어 인증 모드와 요구 역할
//! - [`token`]: JWT 클레임과 토큰 쌍

pub mod auth;
pub mod token;

pub use auth::*;
pub use token::*;

//! 인증 서비스 모듈
//!
//! - [`TokenService`] - HS256 JWT 발급/검증 (`token_type`으로 액세스/리프레시 구분)
//! - [`AuthService`] - 회원가입, 로그인, 리프레시 토큰 교체, 로그아웃
//!
//! ```rust,ignore
//! use crate::services::auth::AuthService;
//!
//! let pair = AuthService::instance().refresh(&request.refresh_token).await?;
//! ```

pub mod token_service;
pub mod auth_service;

pub use token_service::*;
pub use auth_service::*;

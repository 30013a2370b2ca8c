//! 사용자 관리 서비스 모듈
//!
//! 사용자 등록, 비밀번호 검증, 프로필/아바타 관리, 연쇄 삭제를 담당합니다.
//!
//! # Security
//!
//! - bcrypt 비밀번호 해싱 (`BCRYPT_COST`)
//! - 이메일/사용자명 중복 방지
//! - 비밀번호 변경 시 리프레시 토큰 일괄 폐기
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user = UserService::instance().get_current_user(&caller).await?;
//! ```

pub mod user_service;

pub use user_service::*;

//! 리프레시 토큰 저장소 모듈
//!
//! Redis에 리프레시 토큰 레코드(해시)를 저장하고 회전/폐기를 관리합니다.
//!
//! ```rust,ignore
//! use crate::repositories::tokens::TokenRepository;
//!
//! let token_repo = TokenRepository::instance();
//! token_repo.store(&record).await?;
//! token_repo.revoke_all("user_id").await?;
//! ```

pub mod token_repository;

pub use token_repository::*;

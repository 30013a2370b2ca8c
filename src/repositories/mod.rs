//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로를 사용하여 싱글톤으로 관리되는 리포지토리들을 제공합니다.
//! MongoDB를 주 저장소로 사용하고, 사용자 조회 캐시와 리프레시 토큰은 Redis에 둡니다.
//!
//! | Repository | 저장소 | 컬렉션/키 |
//! |------------|--------|-----------|
//! | `UserRepository` | MongoDB + Redis 캐시 | `users` |
//! | `GameRepository` | MongoDB | `games` |
//! | `LoanRepository` | MongoDB | `loans` |
//! | `DocumentRepository` | MongoDB | `documents` |
//! | `TokenRepository` | Redis | `refresh_token:{user_id}:{jti}` |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::games::GameRepository;
//!
//! let game_repo = GameRepository::instance();
//! let game = game_repo.find_by_id(&game_id).await?;
//! ```

pub mod users;
pub mod games;
pub mod loans;
pub mod documents;
pub mod tokens;

use crate::errors::AppError;

/// 서버 기동 시 모든 컬렉션의 인덱스를 생성합니다.
pub async fn create_all_indexes() -> Result<(), AppError> {
    users::UserRepository::instance().create_indexes().await?;
    games::GameRepository::instance().create_indexes().await?;
    loans::LoanRepository::instance().create_indexes().await?;
    documents::DocumentRepository::instance().create_indexes().await?;
    Ok(())
}

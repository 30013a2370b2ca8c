//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//! 의존성은 `Arc<T>` 필드로 선언하면 `ServiceLocator`가 주입합니다.
//!
//! ```text
//! AuthService ──▶ UserService ──▶ GameService ──▶ DocumentService
//!      │               │                                 ▲
//!      └─▶ TokenService └─────────────────────────────────┘
//! LoanService (GameRepository, LoanRepository)
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{games::GameService, loans::LoanService};
//!
//! let games = GameService::instance().list_games(query).await?;
//! let loan = LoanService::instance().request_loan(&caller, request).await?;
//! ```

pub mod auth;
pub mod users;
pub mod games;
pub mod loans;
pub mod documents;

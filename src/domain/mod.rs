//! # Domain Layer Module
//!
//! 게임 대여 서비스의 도메인 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── Entities  - MongoDB/Redis에 저장되는 핵심 객체와 비즈니스 규칙
//! ├── DTOs      - API 요청/응답 계약
//! └── Models    - 저장되지 않는 인증/토큰 모델
//!      │
//!      ▼
//! Application Layer (Services)
//!      │
//!      ▼
//! Infrastructure Layer (Repositories, DB, FileStorage)
//! ```
//!
//! ## 사용자 등록 플로우
//!
//! ```rust,ignore
//! use crate::domain::dto::users::{request::CreateUserRequest, response::UserResponse};
//! use crate::domain::entities::users::User;
//!
//! request.validate()?;
//! let user = User::new_local(request.email, request.username, request.display_name, hash);
//! let saved = user_repo.create(user).await?;
//! let response = UserResponse::from(saved);
//! ```
//!
//! ## 대여 요청 플로우
//!
//! ```rust,ignore
//! let due = resolve_due_date(request.due_date_bson(), now, LoanConfig::default_loan_days());
//! validate_loan_request(&game, &borrower_id, due, now, LoanConfig::max_loan_days())?;
//! // 게임 상태 AVAILABLE → BORROWED 조건부 갱신 후 Loan 저장
//! ```

pub mod entities;
pub mod dto;
pub mod models;

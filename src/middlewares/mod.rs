//! 미들웨어 모듈
//!
//! ActixWeb 요청 처리 파이프라인의 횡단 관심사를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 액세스 토큰 추출 및 검증
//! - 사용자 정보를 request extension에 저장
//! - 필수/선택 인증 모드와 역할 요구 지원
//! - 실패 시 `AppError` 형식의 JSON 401/403 응답
//!
//! ```rust,ignore
//! use actix_web::web;
//! use crate::middlewares::AuthMiddleware;
//!
//! web::scope("/api/loans")
//!     .wrap(AuthMiddleware::required())
//!     .service(create_loan);
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;

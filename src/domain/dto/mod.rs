//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 요청/응답 구조체입니다. 요청 DTO는 `validator`로
//! 검증하고, 응답 DTO는 엔티티에서 `From` 변환으로 만듭니다.
//! JSON 필드 이름은 snake_case, 시각은 RFC 3339 문자열입니다.
//!
//! ```text
//! dto/
//! ├── common.rs     # 페이지네이션, 시각 변환
//! ├── auth/         # 로그인, 토큰 갱신, 로그아웃
//! ├── users/        # 회원가입, 사용자 수정/응답
//! ├── games/        # 게임 등록/수정/검색/응답
//! ├── loans/        # 대여 요청/응답
//! └── documents/    # 업로드 쿼리/문서 응답
//! ```
//!
//! ## 명명 규칙
//! - **Request DTO**: `{Action}{Entity}Request` (예: `CreateGameRequest`)
//! - **Response DTO**: `{Entity}Response` (예: `LoanResponse`)
//! - **Query DTO**: `{Entity}ListQuery` (예: `GameListQuery`)

pub mod common;
pub mod auth;
pub mod users;
pub mod games;
pub mod loans;
pub mod documents;

pub use common::*;
pub use auth::*;
pub use users::*;
pub use games::*;
pub use loans::*;
pub use documents::*;

//! # User Data Transfer Objects Module
//!
//! ```text
//! users/
//! ├── request/
//! │   ├── create_user_request.rs   # 회원가입
//! │   └── update_user_request.rs   # 프로필/비밀번호 수정
//! └── response/
//!     └── user_response.rs         # 사용자 정보 (비밀번호 해시 제외)
//! ```
//!
//! ## 검증 규칙
//!
//! - **이메일**: 이메일 형식
//! - **사용자명**: 3-30자, 영문/숫자/언더스코어만 허용
//! - **표시 이름**: 1-50자
//! - **비밀번호**: 최소 8자, 대소문자와 숫자 포함
//!
//! ## JSON 응답 예제
//!
//! ```json
//! {
//!   "id": "507f1f77bcf86cd799439011",
//!   "email": "user@example.com",
//!   "username": "john_doe",
//!   "display_name": "John Doe",
//!   "roles": ["USER"],
//!   "is_active": true,
//!   "avatar_document_id": null,
//!   "last_login_at": "2024-01-15T10:30:00Z",
//!   "created_at": "2024-01-01T00:00:00Z",
//!   "updated_at": "2024-01-15T10:30:00Z"
//! }
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

//! # 사용자 관련 응답 DTO 모듈
//!
//! 민감한 정보(비밀번호 해시)는 응답에서 제외하고, 시각은 RFC 3339 문자열로 내보냅니다.

pub mod user_response;

pub use user_response::UserResponse;

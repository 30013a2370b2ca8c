//! # 사용자 관련 요청 DTO 모듈

pub mod create_user_request;
pub mod update_user_request;

pub use create_user_request::CreateUserRequest;
pub use update_user_request::UpdateUserRequest;

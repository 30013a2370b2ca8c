//! # Configuration Module
//!
//! 환경 변수 기반 설정 모듈입니다. `main.rs`에서 `PROFILE`에 따라
//! `.env.dev` / `.env.prod` 파일을 먼저 로드한 뒤 각 설정 함수가 값을 읽습니다.
//!
//! - [`data_config`]: 실행 환경, 서버, 비밀번호, 저장소, 요청 제한, 대여 정책
//! - [`auth_config`]: JWT 토큰 설정

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;

//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 검색어 이스케이프, 파일 이름 정리
//! - [`display_terminal`] - 레지스트리 초기화 및 서버 기동 출력

pub mod string_utils;
pub mod display_terminal;

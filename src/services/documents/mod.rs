//! 문서(파일) 서비스 모듈

pub mod document_service;

pub use document_service::*;

//! 업로드 파일 저장소 모듈
//!
//! `FileStorage`는 `main.rs`에서 생성되어 `ServiceLocator::set()`으로 등록되고,
//! `DocumentService`의 `Arc<FileStorage>` 필드로 주입됩니다.

pub mod file_storage;

pub use file_storage::*;

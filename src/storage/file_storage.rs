//! 로컬 디스크 파일 저장소
//!
//! 업로드된 이미지와 문서의 바이트를 `UPLOAD_DIR` 아래에 저장합니다.
//! 메타데이터는 `documents` 컬렉션에 따로 저장되며, 이 모듈은 바이트만 다룹니다.
//!
//! ## 저장 키 형식
//!
//! ```text
//! 3f/3fa85f6457174562b3fc2c963f66afa6.png
//! └┬┘└──────────────┬──────────────┘ └┬┘
//!  샤드 디렉터리      UUID (simple)      확장자
//! ```
//!
//! 키는 저장소가 직접 생성하며, 외부에서 들어온 키는 같은 형식인지
//! 검사한 뒤에만 경로로 변환합니다.

use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;
use crate::config::StorageConfig;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `StorageConfig::upload_dir()`를 루트로 사용하는 저장소를 만들고 디렉터리를 준비합니다.
    pub async fn from_config() -> Result<Self, AppError> {
        let storage = Self::new(StorageConfig::upload_dir());
        fs::create_dir_all(&storage.root).await.map_err(|e| {
            AppError::StorageError(format!("업로드 디렉터리 생성 실패 ({}): {}", storage.root.display(), e))
        })?;

        log::info!("✅ 파일 저장소 준비 완료: {}", storage.root.display());
        Ok(storage)
    }

    /// 바이트를 새 파일로 저장하고 저장 키를 반환합니다.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> Result<String, AppError> {
        let key = Self::generate_key(extension);
        let path = self.resolve(&key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::StorageError(format!("디렉터리 생성 실패: {}", e)))?;
        }

        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::StorageError(format!("파일 쓰기 실패: {}", e)))?;

        log::debug!("파일 저장: {} ({} bytes)", key, bytes.len());
        Ok(key)
    }

    /// 저장 키로 파일을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 형식에 맞지 않는 키
    /// * `AppError::NotFound` - 파일 없음
    pub async fn load(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.resolve(key)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("저장된 파일을 찾을 수 없습니다: {}", key)))
            }
            Err(e) => Err(AppError::StorageError(format!("파일 읽기 실패: {}", e))),
        }
    }

    /// 파일을 삭제합니다. 이미 없으면 `false`를 반환합니다.
    pub async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::StorageError(format!("파일 삭제 실패: {}", e))),
        }
    }

    fn generate_key(extension: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let shard = &id[..2];
        let extension: String = extension
            .trim_start_matches('.')
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(10)
            .collect::<String>()
            .to_lowercase();

        if extension.is_empty() {
            format!("{}/{}", shard, id)
        } else {
            format!("{}/{}.{}", shard, id, extension)
        }
    }

    /// 저장 키를 루트 아래의 실제 경로로 변환합니다.
    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        if !Self::is_valid_key(key) {
            return Err(AppError::ValidationError(format!("잘못된 저장 키입니다: {}", key)));
        }
        Ok(self.root.join(key))
    }

    /// `xx/<32 hex>[.ext]` 형식이고 샤드가 이름의 앞 두 글자와 같은지 검사합니다.
    fn is_valid_key(key: &str) -> bool {
        let Some((shard, file_name)) = key.split_once('/') else {
            return false;
        };

        let stem = match file_name.split_once('.') {
            Some((stem, ext)) => {
                if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return false;
                }
                stem
            }
            None => file_name,
        };

        stem.len() == 32
            && stem.chars().all(|c| c.is_ascii_hexdigit())
            && shard.len() == 2
            && stem.starts_with(shard)
    }
}

/// MIME 타입에 대응하는 파일 확장자
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let key = storage.save(b"box art bytes", "png").await.unwrap();
        assert!(key.ends_with(".png"));
        assert!(dir.path().join(&key).exists());

        let loaded = storage.load(&key).await.unwrap();
        assert_eq!(loaded, b"box art bytes");

        assert!(storage.delete(&key).await.unwrap());
        assert!(!storage.delete(&key).await.unwrap());
        assert!(matches!(storage.load(&key).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_keys_are_sharded_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let first = storage.save(b"a", "txt").await.unwrap();
        let second = storage.save(b"a", "txt").await.unwrap();

        assert_ne!(first, second);
        let (shard, name) = first.split_once('/').unwrap();
        assert_eq!(shard.len(), 2);
        assert!(name.starts_with(shard));
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["../secret.txt", "/etc/passwd", "ab/../../x", "ab/cd", ""] {
            assert!(
                matches!(storage.load(key).await, Err(AppError::ValidationError(_))),
                "key should be rejected: {key}"
            );
        }
    }

    #[test]
    fn test_generate_key_sanitizes_extension() {
        let key = FileStorage::generate_key(".P/N..G");
        assert!(key.ends_with(".png"));
        assert!(FileStorage::is_valid_key(&key));

        let bare = FileStorage::generate_key("");
        assert!(!bare.contains('.'));
        assert!(FileStorage::is_valid_key(&bare));
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_content_type("application/pdf"), "pdf");
        assert_eq!(extension_for_content_type("application/zip"), "bin");
    }
}

//! 문서(파일) 서비스
//!
//! 업로드 검증(크기 413, 형식 415) → SHA-256 체크섬 → `FileStorage` 저장 →
//! 메타데이터 저장 순서로 처리합니다. 메타데이터 저장이 실패하면 파일을 지웁니다.

use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, Bson};
use sha2::{Digest, Sha256};
use singleton_macro::service;
use crate::{
    config::StorageConfig,
    domain::dto::documents::{DocumentResponse, UploadCommand},
    domain::entities::documents::{Document, DocumentKind},
    domain::models::auth::AuthenticatedUser,
    errors::AppError,
    repositories::{documents::DocumentRepository, games::GameRepository, users::UserRepository},
    storage::{extension_for_content_type, FileStorage},
    utils::string_utils::{parse_object_id, sanitize_file_name},
};

/// `Content-Type` 헤더 값에서 파라미터를 떼고 소문자로 정규화합니다.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// 업로드 크기와 콘텐츠 타입을 검사합니다.
pub fn validate_upload(
    kind: DocumentKind,
    content_type: &str,
    size: usize,
    max_bytes: usize,
    allowed: &[String],
) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::ValidationError("빈 파일은 업로드할 수 없습니다".to_string()));
    }

    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "파일 크기가 제한({} bytes)을 초과했습니다: {} bytes",
            max_bytes, size
        )));
    }

    if !allowed.iter().any(|t| t == content_type) {
        return Err(AppError::UnsupportedMediaType(format!(
            "허용되지 않은 파일 형식입니다: {}",
            content_type
        )));
    }

    if kind.requires_image() && !content_type.starts_with("image/") {
        return Err(AppError::UnsupportedMediaType(
            "이미지 파일만 업로드할 수 있습니다".to_string(),
        ));
    }

    Ok(())
}

/// 바이트의 SHA-256 hex
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[service(name = "document")]
pub struct DocumentService {
    document_repo: Arc<DocumentRepository>,
    game_repo: Arc<GameRepository>,
    user_repo: Arc<UserRepository>,
    storage: Arc<FileStorage>,
}

impl DocumentService {
    /// 파일을 저장하고 메타데이터를 기록합니다.
    ///
    /// 게임에 첨부하는 경우 게임 소유자 또는 관리자만 가능합니다.
    pub async fn upload(&self, caller: &AuthenticatedUser, command: UploadCommand) -> Result<Document, AppError> {
        let owner_id = caller.object_id()?;
        let content_type = normalize_content_type(&command.content_type);

        validate_upload(
            command.kind,
            &content_type,
            command.bytes.len(),
            StorageConfig::max_upload_bytes(),
            &StorageConfig::allowed_content_types(),
        )?;

        let game_id = match command.game_id.as_deref() {
            Some(raw) => {
                let game_id = parse_object_id(raw, "게임 ID")?;
                let game = self.game_repo
                    .find_by_id(&game_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("게임을 찾을 수 없습니다".to_string()))?;
                caller.ensure_can_act_for(&game.owner_id)?;
                Some(game_id)
            }
            None => None,
        };

        let storage_key = self.storage
            .save(&command.bytes, extension_for_content_type(&content_type))
            .await?;

        let document = Document::new(
            owner_id,
            game_id,
            command.kind,
            sanitize_file_name(&command.file_name),
            content_type,
            command.bytes.len() as i64,
            checksum(&command.bytes),
            storage_key.clone(),
        );

        match self.document_repo.create(document).await {
            Ok(saved) => {
                log::info!(
                    "📄 문서 업로드 완료 - id: {}, kind: {:?}, size: {} bytes",
                    saved.id_string().unwrap_or_default(),
                    saved.kind,
                    saved.size_bytes
                );
                Ok(saved)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&storage_key).await {
                    log::warn!("업로드 실패 후 파일 정리 실패 - key: {}, error: {}", storage_key, cleanup);
                }
                Err(e)
            }
        }
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, AppError> {
        let id = parse_object_id(id, "문서 ID")?;
        self.document_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("문서를 찾을 수 없습니다".to_string()))
    }

    pub async fn get_metadata(&self, id: &str) -> Result<DocumentResponse, AppError> {
        Ok(DocumentResponse::from(self.get_document(id).await?))
    }

    /// 메타데이터와 파일 바이트를 함께 반환합니다.
    pub async fn download(&self, id: &str) -> Result<(Document, Vec<u8>), AppError> {
        let document = self.get_document(id).await?;
        let bytes = self.storage.load(&document.storage_key).await?;
        Ok((document, bytes))
    }

    pub(crate) async fn find(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        self.document_repo.find_by_id(id).await
    }

    pub async fn download_by_id(&self, id: &ObjectId) -> Result<(Document, Vec<u8>), AppError> {
        self.download(&id.to_hex()).await
    }

    pub async fn list_for_game(&self, game_id: &str) -> Result<Vec<DocumentResponse>, AppError> {
        let game_id = parse_object_id(game_id, "게임 ID")?;

        if self.game_repo.find_by_id(&game_id).await?.is_none() {
            return Err(AppError::NotFound("게임을 찾을 수 없습니다".to_string()));
        }

        let documents = self.document_repo.find_by_game(&game_id).await?;
        Ok(documents.into_iter().map(DocumentResponse::from).collect())
    }

    /// 소유자 또는 관리자만 삭제할 수 있습니다.
    ///
    /// 게임 이미지나 아바타로 연결된 문서라면 연결도 해제합니다.
    pub async fn delete(&self, caller: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let document = self.get_document(id).await?;
        caller.ensure_can_act_for(&document.owner_id)?;

        self.unlink(&document).await?;
        self.remove(&document).await
    }

    async fn unlink(&self, document: &Document) -> Result<(), AppError> {
        let document_id = match document.id {
            Some(id) => id,
            None => return Ok(()),
        };

        match (document.kind, document.game_id) {
            (DocumentKind::GameImage, Some(game_id)) => {
                if let Some(game) = self.game_repo.find_by_id(&game_id).await? {
                    if game.image_document_id == Some(document_id) {
                        self.game_repo
                            .update(&game_id, doc! { "image_document_id": Bson::Null })
                            .await?;
                    }
                }
            }
            (DocumentKind::Avatar, _) => {
                if let Some(user) = self.user_repo.find_by_id(&document.owner_id).await? {
                    if user.avatar_document_id == Some(document_id) {
                        self.user_repo
                            .update(&document.owner_id, doc! { "avatar_document_id": Bson::Null })
                            .await?;
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// 파일과 레코드를 지웁니다. 파일이 이미 없으면 경고만 남깁니다.
    pub(crate) async fn remove(&self, document: &Document) -> Result<(), AppError> {
        if !self.storage.delete(&document.storage_key).await? {
            log::warn!("⚠️ 저장소에 파일이 없습니다 - key: {}", document.storage_key);
        }

        if let Some(id) = document.id {
            self.document_repo.delete(&id).await?;
        }

        Ok(())
    }

    /// 게임 삭제 시 첨부 문서를 모두 제거합니다.
    pub async fn delete_all_for_game(&self, game_id: &ObjectId) -> Result<usize, AppError> {
        let documents = self.document_repo.find_by_game(game_id).await?;
        for document in &documents {
            self.remove(document).await?;
        }
        Ok(documents.len())
    }

    /// 사용자 삭제 시 소유 문서를 모두 제거합니다.
    pub async fn delete_all_for_owner(&self, owner_id: &ObjectId) -> Result<usize, AppError> {
        let documents = self.document_repo.find_by_owner(owner_id).await?;
        for document in &documents {
            self.remove(document).await?;
        }
        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["image/png".to_string(), "application/pdf".to_string()]
    }

    #[test]
    fn test_normalize_content_type() {
        assert_eq!(normalize_content_type("Image/PNG; charset=binary"), "image/png");
        assert_eq!(normalize_content_type(""), "");
    }

    #[test]
    fn test_oversized_upload_is_413() {
        let result = validate_upload(DocumentKind::Attachment, "application/pdf", 11, 10, &allowed());
        assert!(matches!(result, Err(AppError::PayloadTooLarge(_))));
    }

    #[test]
    fn test_disallowed_type_is_415() {
        let result = validate_upload(DocumentKind::Attachment, "application/zip", 5, 10, &allowed());
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_image_kinds_require_image_type() {
        let result = validate_upload(DocumentKind::GameImage, "application/pdf", 5, 10, &allowed());
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));

        assert!(validate_upload(DocumentKind::GameImage, "image/png", 5, 10, &allowed()).is_ok());
        assert!(validate_upload(DocumentKind::Attachment, "application/pdf", 10, 10, &allowed()).is_ok());
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        let result = validate_upload(DocumentKind::Attachment, "image/png", 0, 10, &allowed());
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        assert_eq!(
            checksum(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

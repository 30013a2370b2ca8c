//! 문서(업로드 파일) 메타데이터 엔티티
//!
//! 파일 바이트는 `FileStorage`에 저장되고, 이 문서는 저장 키와 메타데이터만 보관합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// 게임 대표 이미지
    GameImage,
    /// 사용자 프로필 이미지
    Avatar,
    /// 게임에 첨부된 일반 파일 (설명서, 영수증 등)
    Attachment,
}

impl DocumentKind {
    /// 이미지 종류는 `image/*` 콘텐츠 타입만 허용합니다.
    pub fn requires_image(&self) -> bool {
        matches!(self, DocumentKind::GameImage | DocumentKind::Avatar)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<ObjectId>,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// SHA-256 hex
    pub checksum: String,
    pub storage_key: String,
    pub created_at: DateTime,
}

impl Document {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner_id: ObjectId,
        game_id: Option<ObjectId>,
        kind: DocumentKind,
        file_name: String,
        content_type: String,
        size_bytes: i64,
        checksum: String,
        storage_key: String,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            game_id,
            kind,
            file_name,
            content_type,
            size_bytes,
            checksum,
            storage_key,
            created_at: DateTime::now(),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_kinds() {
        assert!(DocumentKind::GameImage.requires_image());
        assert!(DocumentKind::Avatar.requires_image());
        assert!(!DocumentKind::Attachment.requires_image());
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(serde_json::to_string(&DocumentKind::GameImage).unwrap(), "\"GAME_IMAGE\"");
        let kind: DocumentKind = serde_json::from_str("\"ATTACHMENT\"").unwrap();
        assert_eq!(kind, DocumentKind::Attachment);
    }
}

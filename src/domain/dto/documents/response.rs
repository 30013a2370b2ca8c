use serde::{Deserialize, Serialize};
use crate::domain::dto::common::to_rfc3339;
use crate::domain::entities::documents::{Document, DocumentKind};

/// 문서 메타데이터 응답. 저장 키는 노출하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: String,
    pub owner_id: String,
    pub game_id: Option<String>,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub created_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: document.owner_id.to_hex(),
            game_id: document.game_id.map(|id| id.to_hex()),
            kind: document.kind,
            file_name: document.file_name,
            content_type: document.content_type,
            size_bytes: document.size_bytes,
            checksum: document.checksum,
            created_at: to_rfc3339(document.created_at),
        }
    }
}

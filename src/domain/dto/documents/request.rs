use serde::{Deserialize, Serialize};
use crate::domain::entities::documents::DocumentKind;

/// `POST /api/documents?game_id=&file_name=&kind=` 쿼리
///
/// 본문은 파일 바이트 그대로이고, 콘텐츠 타입은 `Content-Type` 헤더로 받습니다.
/// `kind`를 생략하면 `ATTACHMENT`입니다. 다른 종류는 400으로 거절됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadDocumentQuery {
    pub game_id: Option<String>,
    pub file_name: Option<String>,
    pub kind: Option<DocumentKind>,
}

/// 서비스 계층으로 전달되는 업로드 명령
#[derive(Debug, Clone)]
pub struct UploadCommand {
    pub game_id: Option<String>,
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

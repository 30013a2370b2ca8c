//! 문서 HTTP 핸들러 (`/api/documents`, 인증 필요)
//!
//! 업로드 본문은 파일 바이트 그대로이며 메타데이터는 쿼리 문자열로 받습니다.
//! 아바타와 게임 이미지는 각각 `PUT /api/users/{id}/avatar`, `PUT /api/games/{id}/image`로만 올립니다.

use actix_web::{web, HttpRequest, HttpResponse, get, post, delete};
use crate::domain::dto::documents::{DocumentResponse, UploadCommand, UploadDocumentQuery};
use crate::domain::entities::documents::DocumentKind;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::handlers::{file_response, upload_content_type};
use crate::services::documents::DocumentService;

/// 이 엔드포인트는 `ATTACHMENT`만 받습니다.
fn attachment_kind(kind: Option<DocumentKind>) -> Result<DocumentKind, AppError> {
    match kind.unwrap_or(DocumentKind::Attachment) {
        DocumentKind::Attachment => Ok(DocumentKind::Attachment),
        _ => Err(AppError::ValidationError(
            "아바타와 게임 이미지는 사용자/게임 이미지 엔드포인트로 업로드해야 합니다".to_string(),
        )),
    }
}

#[post("")]
pub async fn upload_document(
    req: HttpRequest,
    user: AuthenticatedUser,
    query: web::Query<UploadDocumentQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let kind = attachment_kind(query.kind)?;
    let content_type = upload_content_type(&req)?;

    let command = UploadCommand {
        game_id: query.game_id,
        kind,
        file_name: query.file_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "file".to_string()),
        content_type,
        bytes: body.to_vec(),
    };

    let document = DocumentService::instance().upload(&user, command).await?;

    Ok(HttpResponse::Created().json(DocumentResponse::from(document)))
}

#[get("/{document_id}")]
pub async fn get_document(
    _user: AuthenticatedUser,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = DocumentService::instance().get_metadata(&document_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 파일 내용을 원래 콘텐츠 타입으로 내려줍니다.
#[get("/{document_id}/content")]
pub async fn get_content(
    _user: AuthenticatedUser,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (document, bytes) = DocumentService::instance().download(&document_id).await?;
    Ok(file_response(&document, bytes))
}

#[delete("/{document_id}")]
pub async fn delete_document(
    user: AuthenticatedUser,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    DocumentService::instance().delete(&user, &document_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

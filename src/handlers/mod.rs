//! HTTP 핸들러 모듈
//!
//! 각 핸들러는 요청 DTO 검증 후 `Service::instance()`로 서비스에 위임하고,
//! 에러는 `AppError`의 `ResponseError` 구현으로 JSON 응답이 됩니다.
//!
//! | 모듈 | 경로 |
//! |------|------|
//! | [`auth`] | `/api/auth` |
//! | [`users`] | `/api/users` |
//! | [`games`] | `/api/games` |
//! | [`loans`] | `/api/loans` |
//! | [`documents`] | `/api/documents` |
//!
//! 파일 업로드는 multipart 대신 요청 본문 바이트와 `Content-Type` 헤더를 그대로 받습니다.

pub mod auth;
pub mod users;
pub mod games;
pub mod loans;
pub mod documents;

use actix_web::{http::header, HttpRequest, HttpResponse};
use crate::domain::entities::documents::Document;
use crate::errors::AppError;

/// 업로드 요청의 `Content-Type` 헤더 값. 없으면 415입니다.
pub(crate) fn upload_content_type(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::UnsupportedMediaType("Content-Type 헤더가 필요합니다".to_string()))
}

/// 저장된 파일을 원래 콘텐츠 타입으로 응답합니다.
pub(crate) fn file_response(document: &Document, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.content_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", document.file_name.replace('"', "")),
        ))
        .insert_header((header::ETAG, format!("\"{}\"", document.checksum)))
        .body(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use mongodb::bson::oid::ObjectId;
    use crate::domain::entities::documents::DocumentKind;

    #[test]
    fn test_upload_content_type_requires_header() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(upload_content_type(&req), Err(AppError::UnsupportedMediaType(_))));

        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .to_http_request();
        assert_eq!(upload_content_type(&req).unwrap(), "image/png");
    }

    #[test]
    fn test_file_response_headers() {
        let document = Document::new(
            ObjectId::new(),
            None,
            DocumentKind::Attachment,
            "manual.pdf".to_string(),
            "application/pdf".to_string(),
            3,
            "abc123".to_string(),
            "ab/key.pdf".to_string(),
        );

        let response = file_response(&document, vec![1, 2, 3]);
        let headers = response.headers();

        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(headers.get(header::ETAG).unwrap(), "\"abc123\"");
        assert!(headers
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("manual.pdf"));
    }
}

//! 게임 HTTP 핸들러 (`/api/games`, 인증 필요)
//!
//! 수정/삭제/이미지 변경은 소유자 또는 관리자만 가능합니다.

use actix_web::{web, HttpRequest, HttpResponse, get, post, put, delete};
use validator::Validate;
use crate::domain::dto::games::{CreateGameRequest, GameListQuery, UpdateGameRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::handlers::{file_response, upload_content_type};
use crate::services::games::GameService;

/// 게임 목록 (상태/플랫폼/소유자/제목 검색, 페이지네이션)
#[get("")]
pub async fn list_games(
    _user: AuthenticatedUser,
    query: web::Query<GameListQuery>,
) -> Result<HttpResponse, AppError> {
    let response = GameService::instance().list_games(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("")]
pub async fn create_game(
    user: AuthenticatedUser,
    payload: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = GameService::instance()
        .create_game(&user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/{game_id}")]
pub async fn get_game(
    _user: AuthenticatedUser,
    game_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = GameService::instance().get_game(&game_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{game_id}")]
pub async fn update_game(
    user: AuthenticatedUser,
    game_id: web::Path<String>,
    payload: web::Json<UpdateGameRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = GameService::instance()
        .update_game(&user, &game_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{game_id}")]
pub async fn delete_game(
    user: AuthenticatedUser,
    game_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    GameService::instance().delete_game(&user, &game_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// 요청 본문을 게임 대표 이미지로 저장합니다.
#[put("/{game_id}/image")]
pub async fn upload_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    game_id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = upload_content_type(&req)?;

    let response = GameService::instance()
        .set_image(&user, &game_id, content_type, body.to_vec())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{game_id}/image")]
pub async fn get_image(
    _user: AuthenticatedUser,
    game_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (document, bytes) = GameService::instance().get_image(&game_id).await?;
    Ok(file_response(&document, bytes))
}

#[get("/{game_id}/documents")]
pub async fn list_documents(
    _user: AuthenticatedUser,
    game_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = GameService::instance().list_game_documents(&game_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{game_id}/loans")]
pub async fn list_loans(
    user: AuthenticatedUser,
    game_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = GameService::instance().list_game_loans(&user, &game_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use crate::routes::configure_game_routes;
    use crate::services::auth::{issue_tokens, JwtSettings};

    fn bearer() -> String {
        let issued = issue_tokens("64b0000000000000000000aa", &["user".to_string()], &JwtSettings::from_config(), Utc::now().timestamp()).unwrap();
        format!("Bearer {}", issued.pair.access_token)
    }

    #[actix_web::test]
    async fn test_games_scope_requires_token() {
        let app = test::init_service(App::new().configure(configure_game_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/games").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "authentication_required");
    }

    #[actix_web::test]
    async fn test_create_game_rejects_empty_title() {
        let app = test::init_service(App::new().configure(configure_game_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/games")
            .insert_header(("Authorization", bearer()))
            .set_json(serde_json::json!({ "title": "", "platform": "PC" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_image_upload_without_content_type_is_415() {
        let app = test::init_service(App::new().configure(configure_game_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/games/64b0000000000000000000cc/image")
            .insert_header(("Authorization", bearer()))
            .set_payload(vec![0x89u8, 0x50, 0x4e, 0x47])
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}

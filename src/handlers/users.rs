//! 사용자 HTTP 핸들러 (`/api/users`, 인증 필요)
//!
//! `/me`는 `/{user_id}`보다 먼저 등록되어야 합니다.

use actix_web::{web, HttpRequest, HttpResponse, get, put, delete};
use validator::Validate;
use crate::domain::dto::common::PageQuery;
use crate::domain::dto::users::request::UpdateUserRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::handlers::{file_response, upload_content_type};
use crate::services::games::GameService;
use crate::services::users::user_service::UserService;

#[get("/me")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = UserService::instance().get_current_user(&user).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 관리자 전용 사용자 목록
#[get("")]
pub async fn list_users(
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let response = UserService::instance().list_users(&user, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{user_id}")]
pub async fn get_user(
    _user: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = UserService::instance().get_user_by_id(&user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/{user_id}")]
pub async fn update_user(
    user: AuthenticatedUser,
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    if !user.can_act_for(&user_id) {
        return Err(AppError::AuthorizationError("본인 또는 관리자만 수정할 수 있습니다".to_string()));
    }

    let response = UserService::instance()
        .update_user(&user, &user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    user: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    if !user.can_act_for(&user_id) {
        return Err(AppError::AuthorizationError("본인 또는 관리자만 삭제할 수 있습니다".to_string()));
    }

    UserService::instance().delete_user(&user, &user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 요청 본문을 아바타 이미지로 저장합니다.
#[put("/{user_id}/avatar")]
pub async fn upload_avatar(
    req: HttpRequest,
    user: AuthenticatedUser,
    user_id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = upload_content_type(&req)?;

    let response = UserService::instance()
        .set_avatar(&user, &user_id, content_type, body.to_vec())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{user_id}/avatar")]
pub async fn get_avatar(
    _user: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (document, bytes) = UserService::instance().get_avatar(&user_id).await?;
    Ok(file_response(&document, bytes))
}

/// 사용자가 등록한 게임 목록
#[get("/{user_id}/games")]
pub async fn list_user_games(
    _user: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = GameService::instance().list_user_games(&user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use crate::routes::configure_user_routes;
    use crate::services::auth::{issue_tokens, JwtSettings};

    fn bearer(user_id: &str) -> String {
        let issued = issue_tokens(user_id, &["user".to_string()], &JwtSettings::from_config(), Utc::now().timestamp()).unwrap();
        format!("Bearer {}", issued.pair.access_token)
    }

    #[actix_web::test]
    async fn test_users_scope_requires_token() {
        let app = test::init_service(App::new().configure(configure_user_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/users/me").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_update_other_user_is_forbidden() {
        let app = test::init_service(App::new().configure(configure_user_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/users/64b0000000000000000000bb")
            .insert_header(("Authorization", bearer("64b0000000000000000000aa")))
            .set_json(serde_json::json!({ "display_name": "Mallory" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_password_change_without_current_password_is_400() {
        let app = test::init_service(App::new().configure(configure_user_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/users/64b0000000000000000000aa")
            .insert_header(("Authorization", bearer("64b0000000000000000000aa")))
            .set_json(serde_json::json!({ "new_password": "N3w-Passw0rd!" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_avatar_upload_without_content_type_is_415() {
        let app = test::init_service(App::new().configure(configure_user_routes)).await;

        let req = test::TestRequest::put()
            .uri("/api/users/64b0000000000000000000aa/avatar")
            .insert_header(("Authorization", bearer("64b0000000000000000000aa")))
            .set_payload(vec![1u8, 2, 3])
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}

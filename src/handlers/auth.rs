//! Authentication HTTP Handlers
//!
//! 회원가입, 로그인, 토큰 갱신, 로그아웃, 토큰 확인 엔드포인트입니다.
//!
//! - `POST /api/auth/register` - 회원가입 후 토큰 쌍 발급 (201)
//! - `POST /api/auth/login` - 이메일/비밀번호 로그인
//! - `POST /api/auth/refresh` - 리프레시 토큰 교체
//! - `POST /api/auth/logout` - 리프레시 토큰 폐기 (인증 필요)
//! - `GET /api/auth/verify` - 액세스 토큰 확인 (인증 필요)
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;
use crate::domain::dto::auth::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest, TokenVerifyResponse};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::middlewares::AuthMiddleware;
use crate::services::auth::AuthService;

#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = AuthService::instance().register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = AuthService::instance().login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 리프레시 토큰을 새 토큰 쌍으로 교체합니다. 사용한 토큰은 폐기됩니다.
#[post("/refresh")]
pub async fn refresh_tokens(
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let pair = AuthService::instance().refresh(&payload.refresh_token).await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// 본문이 없거나 `refresh_token`이 없으면 모든 기기에서 로그아웃합니다.
#[post("/logout", wrap = "AuthMiddleware::required()")]
pub async fn logout(
    user: AuthenticatedUser,
    payload: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = payload.and_then(|p| p.into_inner().refresh_token);

    AuthService::instance()
        .logout(&user, refresh_token.as_deref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[get("/verify", wrap = "AuthMiddleware::required()")]
pub async fn verify_token(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(TokenVerifyResponse {
        valid: true,
        user_id: user.user_id,
        roles: user.roles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use crate::routes::configure_auth_routes;
    use crate::services::auth::{issue_tokens, JwtSettings};

    #[actix_web::test]
    async fn test_register_rejects_invalid_payload() {
        let app = test::init_service(App::new().configure(configure_auth_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(serde_json::json!({
                "email": "not-an-email",
                "username": "ab",
                "display_name": "Tester",
                "password": "short",
                "password_confirm": "short"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[actix_web::test]
    async fn test_login_rejects_invalid_email() {
        let app = test::init_service(App::new().configure(configure_auth_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({ "email": "nope", "password": "x" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_refresh_requires_token() {
        let app = test::init_service(App::new().configure(configure_auth_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": "" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_logout_and_verify_require_authentication() {
        let app = test::init_service(App::new().configure(configure_auth_routes)).await;

        let req = test::TestRequest::post().uri("/api/auth/logout").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/auth/verify").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_verify_returns_token_subject() {
        let app = test::init_service(App::new().configure(configure_auth_routes)).await;

        let roles = vec!["user".to_string()];
        let issued = issue_tokens("64b000000000000000000009", &roles, &JwtSettings::from_config(), Utc::now().timestamp()).unwrap();

        let req = test::TestRequest::get()
            .uri("/api/auth/verify")
            .insert_header(("Authorization", format!("Bearer {}", issued.pair.access_token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: TokenVerifyResponse = test::read_body_json(resp).await;
        assert!(body.valid);
        assert_eq!(body.user_id, "64b000000000000000000009");
        assert_eq!(body.roles, roles);
    }
}

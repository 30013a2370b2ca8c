//! API 라우트 설정 모듈
//!
//! 기능별 scope를 묶어 애플리케이션에 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! ## 인증 불필요 (Public 라우트)
//! `/api/auth`의 회원가입/로그인/갱신은 scope에 미들웨어를 걸지 않고,
//! 로그아웃과 토큰 확인만 라우트 단위로 `wrap`합니다.
//! ```rust,ignore
//! #[post("/logout", wrap = "AuthMiddleware::required()")]
//! ```
//!
//! ## 인증 필요
//! 나머지 scope는 전체에 `AuthMiddleware::required()`를 적용합니다.
//! 관리자 권한은 서비스 계층에서 `AuthenticatedUser::is_admin()`으로 확인합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::config::StorageConfig;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use chrono;
use serde_json::json;

/// 서버 기동 시 출력하는 주요 엔드포인트
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("/health", "헬스체크"),
    ("/api/auth", "회원가입 / 로그인 / 토큰 갱신 / 로그아웃"),
    ("/api/users", "사용자 프로필 / 아바타"),
    ("/api/games", "게임 등록 / 검색 / 이미지"),
    ("/api/loans", "대여 / 반납"),
    ("/api/documents", "파일 업로드 / 다운로드"),
];

/// 모든 라우트를 설정합니다
///
/// 업로드 본문 크기 제한(`MAX_UPLOAD_BYTES`)도 여기서 등록합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(StorageConfig::max_upload_bytes()));

    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_game_routes(cfg);
    configure_loan_routes(cfg);
    configure_document_routes(cfg);
}

/// 인증 라우트
///
/// - `POST /api/auth/register`
/// - `POST /api/auth/login`
/// - `POST /api/auth/refresh`
/// - `POST /api/auth/logout` (인증 필요)
/// - `GET /api/auth/verify` (인증 필요)
///
/// ```bash
/// curl -X POST http://localhost:8080/api/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"password123"}'
/// ```
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::refresh_tokens)
            .service(handlers::auth::logout)
            .service(handlers::auth::verify_token)
    );
}

/// 사용자 라우트. `/me`를 `/{user_id}`보다 먼저 등록합니다.
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::list_users)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::delete_user)
            .service(handlers::users::upload_avatar)
            .service(handlers::users::get_avatar)
            .service(handlers::users::list_user_games)
    );
}

pub fn configure_game_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/games")
            .wrap(AuthMiddleware::required())
            .service(handlers::games::list_games)
            .service(handlers::games::create_game)
            .service(handlers::games::get_game)
            .service(handlers::games::update_game)
            .service(handlers::games::delete_game)
            .service(handlers::games::upload_image)
            .service(handlers::games::get_image)
            .service(handlers::games::list_documents)
            .service(handlers::games::list_loans)
    );
}

/// 대여 라우트. `/borrowed`, `/lent`를 `/{loan_id}`보다 먼저 등록합니다.
pub fn configure_loan_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/loans")
            .wrap(AuthMiddleware::required())
            .service(handlers::loans::create_loan)
            .service(handlers::loans::borrowed)
            .service(handlers::loans::lent)
            .service(handlers::loans::get_loan)
            .service(handlers::loans::return_loan)
    );
}

pub fn configure_document_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/documents")
            .wrap(AuthMiddleware::required())
            .service(handlers::documents::upload_document)
            .service(handlers::documents::get_document)
            .service(handlers::documents::get_content)
            .service(handlers::documents::delete_document)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "game_lending_service",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T00:00:00Z",
///   "features": { "database": "MongoDB", "cache": "Redis", "storage": "Local FS" }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "game_lending_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "storage": "Local FS",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "game_lending_service");
    }

    #[actix_web::test]
    async fn test_unknown_route_is_404() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/unknown").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

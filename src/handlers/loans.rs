//! 대여 HTTP 핸들러 (`/api/loans`, 인증 필요)
//!
//! `/borrowed`, `/lent`는 `/{loan_id}`보다 먼저 등록되어야 합니다.

use actix_web::{web, HttpResponse, get, post};
use validator::Validate;
use crate::domain::dto::loans::CreateLoanRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::loans::LoanService;

/// 대여 요청. 호출자가 대여인(borrower)이 됩니다.
#[post("")]
pub async fn create_loan(
    user: AuthenticatedUser,
    payload: web::Json<CreateLoanRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = LoanService::instance()
        .request_loan(&user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/borrowed")]
pub async fn borrowed(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = LoanService::instance().list_borrowed(&user).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/lent")]
pub async fn lent(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let response = LoanService::instance().list_lent(&user).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/{loan_id}")]
pub async fn get_loan(
    user: AuthenticatedUser,
    loan_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = LoanService::instance().get_loan(&user, &loan_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{loan_id}/return")]
pub async fn return_loan(
    user: AuthenticatedUser,
    loan_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = LoanService::instance().return_loan(&user, &loan_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::Utc;
    use crate::routes::configure_loan_routes;
    use crate::services::auth::{issue_tokens, JwtSettings};

    #[actix_web::test]
    async fn test_loans_scope_requires_token() {
        let app = test::init_service(App::new().configure(configure_loan_routes)).await;

        let req = test::TestRequest::get().uri("/api/loans/borrowed").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_loan_rejects_malformed_game_id() {
        let app = test::init_service(App::new().configure(configure_loan_routes)).await;

        let issued = issue_tokens("64b0000000000000000000aa", &["user".to_string()], &JwtSettings::from_config(), Utc::now().timestamp()).unwrap();
        let req = test::TestRequest::post()
            .uri("/api/loans")
            .insert_header(("Authorization", format!("Bearer {}", issued.pair.access_token)))
            .set_json(serde_json::json!({ "game_id": "abc" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
    }
}

use serde::{Deserialize, Serialize};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::models::token::TokenPair;

/// 로그인/회원가입 응답
///
/// ```json
/// {
///   "user": { "id": "...", "email": "..." },
///   "access_token": "eyJhbGciOiJIUzI1NiIs...",
///   "refresh_token": "eyJhbGciOiJIUzI1NiIs...",
///   "token_type": "Bearer",
///   "expires_in": 900,
///   "refresh_expires_in": 604800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// `GET /api/auth/verify` 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenVerifyResponse {
    pub valid: bool,
    pub user_id: String,
    pub roles: Vec<String>,
}

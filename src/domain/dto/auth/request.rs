use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::dto::users::request::CreateUserRequest;

/// 회원가입 요청은 사용자 생성 요청과 같은 형식입니다.
pub type RegisterRequest = CreateUserRequest;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// 로그아웃 요청
///
/// `refresh_token`을 보내면 해당 토큰만, 생략하면 사용자의 모든 리프레시 토큰을 폐기합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest { email: "a@b.com".to_string(), password: "x".to_string() };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest { email: "not-email".to_string(), password: String::new() };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_logout_body_is_optional() {
        let req: LogoutRequest = serde_json::from_str("{}").unwrap();
        assert!(req.refresh_token.is_none());
    }
}

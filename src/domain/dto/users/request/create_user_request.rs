use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 회원가입 요청 DTO
///
/// `POST /api/auth/register`에서 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct CreateUserRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(
        min = 3,
        max = 30,
        message = "사용자명은 3-30자 사이여야 합니다"
    ))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(
        min = 1,
        max = 50,
        message = "표시 이름은 1-50자 사이여야 합니다"
    ))]
    pub display_name: String,

    #[validate(length(
        min = 8,
        message = "비밀번호는 최소 8자 이상이어야 합니다"
    ))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_passwords_match(req: &CreateUserRequest) -> Result<(), ValidationError> {
    if req.password != req.password_confirm {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("비밀번호가 일치하지 않습니다".into()));
    }
    Ok(())
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_username")
            .with_message("사용자명은 알파벳, 숫자, 언더스코어만 사용 가능합니다".into()));
    }
    Ok(())
}

/// 대문자, 소문자, 숫자를 각각 하나 이상 포함해야 합니다.
pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 대문자, 소문자, 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: "luigi@example.com".to_string(),
            username: "luigi_bros".to_string(),
            display_name: "Luigi".to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("Secret123", "Secret123").validate().is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        assert!(request("Secret123", "Secret124").validate().is_err());
    }

    #[test]
    fn test_weak_password() {
        assert!(request("alllowercase1", "alllowercase1").validate().is_err());
    }

    #[test]
    fn test_invalid_username() {
        let mut req = request("Secret123", "Secret123");
        req.username = "bad name!".to_string();
        assert!(req.validate().is_err());
    }
}

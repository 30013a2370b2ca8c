use serde::Deserialize;
use validator::{Validate, ValidationError};
use crate::domain::dto::users::request::create_user_request::{validate_password_strength, validate_username};
use crate::utils::string_utils::deserialize_optional_string;

/// 사용자 정보 수정 요청 DTO
///
/// 모든 필드는 선택이며, 지정된 필드만 변경됩니다.
/// 비밀번호를 바꾸려면 `current_password`와 `new_password`를 함께 보내야 합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_rules"))]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 50, message = "표시 이름은 1-50자 사이여야 합니다"))]
    pub display_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    pub username: Option<String>,

    #[serde(default)]
    pub current_password: Option<String>,

    #[serde(default)]
    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub new_password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.username.is_none() && self.new_password.is_none()
    }
}

fn validate_update_rules(req: &UpdateUserRequest) -> Result<(), ValidationError> {
    if let Some(username) = &req.username {
        validate_username(username)?;
    }

    if let Some(new_password) = &req.new_password {
        if req.current_password.as_deref().map(str::is_empty).unwrap_or(true) {
            return Err(ValidationError::new("current_password_required")
                .with_message("비밀번호를 변경하려면 현재 비밀번호가 필요합니다".into()));
        }
        validate_password_strength(new_password)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_is_valid() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"display_name": "Peach"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(!req.is_empty());
    }

    #[test]
    fn test_blank_fields_become_none() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"display_name": "  ", "username": ""}"#).unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn test_new_password_requires_current_password() {
        let req = UpdateUserRequest {
            new_password: Some("NewSecret1".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateUserRequest {
            current_password: Some("OldSecret1".to_string()),
            new_password: Some("NewSecret1".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_invalid_username_rejected() {
        let req = UpdateUserRequest {
            username: Some("no spaces".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}

use serde::{Deserialize, Serialize};
use crate::domain::dto::common::to_rfc3339;
use crate::domain::entities::users::{Role, User};

/// 사용자 응답 DTO
///
/// 비밀번호 해시는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    pub avatar_document_id: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            username,
            display_name,
            roles,
            is_active,
            avatar_document_id,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            email,
            username,
            display_name,
            roles,
            is_active,
            avatar_document_id: avatar_document_id.map(|id| id.to_hex()),
            last_login_at: last_login_at.map(to_rfc3339),
            created_at: to_rfc3339(created_at),
            updated_at: to_rfc3339(updated_at),
        }
    }
}

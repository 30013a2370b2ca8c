//! 사용자 엔티티
//!
//! `users` 컬렉션에 저장되는 사용자 문서입니다. 게임을 등록하는 소유자(대여자)이자
//! 다른 사용자의 게임을 빌리는 대여인 역할을 모두 수행합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::errors::AppError;

/// 사용자 역할
///
/// DB에는 `USER` / `ADMIN`으로 저장되고, JWT 클레임에는 `as_str()`의 소문자 이름이 들어갑니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_document_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 로컬 계정 사용자를 생성합니다. 기본 역할은 `USER`입니다.
    pub fn new_local(email: String, username: String, display_name: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            username,
            display_name,
            password_hash,
            roles: vec![Role::User],
            is_active: true,
            avatar_document_id: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// JWT 클레임에 넣을 역할 이름 목록
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.as_str().to_string()).collect()
    }
}

/// 진행 중인 대여가 있으면 사용자 삭제를 거부합니다.
pub fn ensure_user_deletable(active_loans: u64) -> Result<(), AppError> {
    if active_loans > 0 {
        return Err(AppError::ConflictError(format!(
            "진행 중인 대여가 {}건 있어 계정을 삭제할 수 없습니다",
            active_loans
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_local_user_defaults() {
        let user = User::new_local(
            "mario@example.com".to_string(),
            "mario".to_string(),
            "Mario".to_string(),
            "$2b$04$hash".to_string(),
        );

        assert!(user.id.is_none());
        assert!(user.is_active);
        assert!(!user.is_admin());
        assert_eq!(user.role_names(), vec!["user".to_string()]);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, Role::User);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_with_active_loans_cannot_be_deleted() {
        assert!(ensure_user_deletable(0).is_ok());
        assert!(matches!(ensure_user_deletable(2), Err(AppError::ConflictError(_))));
    }
}

use std::future::{ready, Ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::errors::AppError;

/// JWT 액세스 토큰에서 추출된 사용자 정보
///
/// `AuthMiddleware`가 요청 extensions에 넣어두고, 핸들러는 추출자로 꺼내 씁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (ObjectId hex)
    pub user_id: String,

    /// 역할 목록 (`user`, `admin`)
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    /// `user_id`를 `ObjectId`로 변환합니다.
    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.user_id)
            .map_err(|_| AppError::AuthenticationError("토큰의 사용자 ID 형식이 올바르지 않습니다".to_string()))
    }

    /// 본인이거나 관리자인지 확인합니다.
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.is_admin()
    }

    /// 리소스 소유자 또는 관리자가 아니면 403을 반환합니다.
    pub fn ensure_can_act_for(&self, owner_id: &ObjectId) -> Result<(), AppError> {
        if self.can_act_for(&owner_id.to_hex()) {
            Ok(())
        } else {
            Err(AppError::AuthorizationError("해당 리소스에 대한 권한이 없습니다".to_string()))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string()
            ))),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

//! 인증 오케스트레이션 서비스
//!
//! 회원가입/로그인 시 토큰 쌍을 발급하고 리프레시 토큰 레코드를 Redis에 저장합니다.
//! 리프레시 시에는 기존 레코드를 폐기하고 새 토큰으로 교체(rotation)하며,
//! 이미 폐기된 토큰이 다시 제시되면 탈취로 간주해 사용자의 모든 토큰을 폐기합니다.
//! 같은 토큰으로 동시에 들어온 갱신 요청은 Redis 선점(`SET NX`)에서 진 쪽이 재사용으로 처리됩니다.

use std::sync::Arc;
use chrono::Utc;
use singleton_macro::service;
use crate::{
    domain::dto::auth::{AuthResponse, LoginRequest, RegisterRequest},
    domain::dto::users::UserResponse,
    domain::entities::tokens::RefreshTokenRecord,
    domain::entities::users::User,
    domain::models::auth::AuthenticatedUser,
    domain::models::token::TokenPair,
    errors::AppError,
    repositories::{tokens::TokenRepository, users::UserRepository},
    services::{auth::TokenService, users::UserService},
    utils::string_utils::parse_object_id,
};

/// 저장된 레코드와 제시된 리프레시 토큰의 대조 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshCheck {
    /// 유효한 최신 토큰
    Valid,
    /// 레코드가 없거나 만료됨
    Unknown,
    /// 폐기된 토큰의 재사용 또는 해시 불일치
    Reused,
}

pub fn check_refresh_record(record: Option<&RefreshTokenRecord>, refresh_token: &str, now: i64) -> RefreshCheck {
    match record {
        None => RefreshCheck::Unknown,
        Some(record) if record.revoked || !record.matches(refresh_token) => RefreshCheck::Reused,
        Some(record) if record.is_expired(now) => RefreshCheck::Unknown,
        Some(_) => RefreshCheck::Valid,
    }
}

#[service(name = "auth")]
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
    user_repo: Arc<UserRepository>,
    token_repo: Arc<TokenRepository>,
}

impl AuthService {
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let user = self.user_service.create_user(request).await?;
        let tokens = self.issue_for(&user).await?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = self.user_service
            .verify_password(&request.email, &request.password)
            .await?;

        self.user_service.record_login(&user).await?;
        let tokens = self.issue_for(&user).await?;

        log::info!("🔓 로그인 성공 - user: {}", user.id_string().unwrap_or_default());

        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
        })
    }

    /// 리프레시 토큰을 검증하고 새 토큰 쌍으로 교체합니다.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.token_service.verify_refresh_token(refresh_token)?;
        let record = self.token_repo.find(&claims.sub, &claims.jti).await?;
        let now = Utc::now().timestamp();

        let record = match (check_refresh_record(record.as_ref(), refresh_token, now), record) {
            (RefreshCheck::Valid, Some(record)) => record,
            (RefreshCheck::Reused, _) => return Err(self.reject_reused(&claims.sub, &claims.jti).await),
            _ => {
                return Err(AppError::AuthenticationError("만료되었거나 폐기된 리프레시 토큰입니다".to_string()));
            }
        };

        if !self.token_repo.claim(&record).await? {
            return Err(self.reject_reused(&claims.sub, &claims.jti).await);
        }

        let user_id = parse_object_id(&claims.sub, "사용자 ID")?;
        let user = self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("사용자를 찾을 수 없습니다".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthorizationError("비활성화된 계정입니다".to_string()));
        }

        self.token_repo.revoke(&record).await?;
        self.issue_for(&user).await
    }

    /// 재사용된 토큰: 사용자의 모든 리프레시 토큰을 폐기하고 401을 돌려줍니다.
    async fn reject_reused(&self, user_id: &str, jti: &str) -> AppError {
        log::warn!("🚨 리프레시 토큰 재사용 감지 - user: {}, jti: {}", user_id, jti);

        if let Err(e) = self.token_repo.revoke_all(user_id).await {
            return e;
        }
        AppError::AuthenticationError("이미 사용된 리프레시 토큰입니다. 다시 로그인해주세요".to_string())
    }

    /// 지정된 리프레시 토큰 하나를 폐기하거나, 생략하면 사용자의 모든 토큰을 폐기합니다.
    pub async fn logout(&self, caller: &AuthenticatedUser, refresh_token: Option<&str>) -> Result<(), AppError> {
        match refresh_token {
            Some(token) => {
                let claims = self.token_service.verify_refresh_token(token)?;
                if claims.sub != caller.user_id {
                    return Err(AppError::AuthorizationError("본인의 토큰만 폐기할 수 있습니다".to_string()));
                }

                if let Some(record) = self.token_repo.find(&claims.sub, &claims.jti).await? {
                    self.token_repo.revoke(&record).await?;
                }
                log::info!("🔒 로그아웃 - user: {}, jti: {}", caller.user_id, claims.jti);
            }
            None => {
                let count = self.token_repo.revoke_all(&caller.user_id).await?;
                log::info!("🔒 전체 로그아웃 - user: {}, {}개 토큰 폐기", caller.user_id, count);
            }
        }

        Ok(())
    }

    async fn issue_for(&self, user: &User) -> Result<TokenPair, AppError> {
        let issued = self.token_service.generate_token_pair(user)?;
        let claims = &issued.refresh_claims;

        let record = RefreshTokenRecord::new(
            &claims.sub,
            &claims.jti,
            &issued.pair.refresh_token,
            claims.iat,
            claims.exp,
        );
        self.token_repo.store(&record).await?;

        Ok(issued.pair)
    }
}

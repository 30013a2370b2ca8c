use std::sync::Arc;
use chrono::Utc;
use singleton_macro::repository;
use crate::caching::redis::RedisClient;
use crate::core::registry::Repository;
use crate::domain::entities::tokens::{refresh_claim_pattern, refresh_token_key, refresh_token_pattern, RefreshTokenRecord};
use crate::errors::AppError;

/// 리프레시 토큰 레코드 Repository
///
/// Redis만 사용합니다. 키는 `refresh_token:{user_id}:{jti}`이고
/// TTL은 토큰 만료 시각까지 남은 시간입니다.
#[repository(name = "token", collection = "tokens")]
pub struct TokenRepository {
    redis: Arc<RedisClient>,
}

impl TokenRepository {
    /// 새로 발급한 리프레시 토큰 레코드를 저장합니다.
    pub async fn store(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        let now = Utc::now().timestamp();
        let ttl = record.ttl_seconds(now);

        self.redis
            .set_with_expiry(&record.redis_key(), record, ttl)
            .await?;

        log::debug!("Refresh token 저장 - user_id: {}, jti: {}, ttl: {}초", record.user_id, record.jti, ttl);
        Ok(())
    }

    pub async fn find(&self, user_id: &str, jti: &str) -> Result<Option<RefreshTokenRecord>, AppError> {
        Ok(self.redis.get::<RefreshTokenRecord>(&refresh_token_key(user_id, jti)).await?)
    }

    /// 회전에 쓸 토큰을 원자적으로 선점합니다.
    ///
    /// 같은 토큰에 대해 처음 호출한 쪽만 `true`를 받습니다. 표시는 토큰 만료 시각까지 유지됩니다.
    pub async fn claim(&self, record: &RefreshTokenRecord) -> Result<bool, AppError> {
        let now = Utc::now().timestamp();
        Ok(self.redis
            .set_if_absent(&record.claim_key(), &now, record.ttl_seconds(now))
            .await?)
    }

    /// 레코드를 폐기 상태로 바꿉니다. 재사용 감지를 위해 만료 시각까지 남겨둡니다.
    pub async fn revoke(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        let now = Utc::now().timestamp();
        let revoked = RefreshTokenRecord { revoked: true, ..record.clone() };

        self.redis
            .set_with_expiry(&revoked.redis_key(), &revoked, revoked.ttl_seconds(now))
            .await?;
        Ok(())
    }

    /// 사용자의 모든 리프레시 토큰을 폐기합니다. 폐기한 개수를 반환합니다.
    pub async fn revoke_all(&self, user_id: &str) -> Result<usize, AppError> {
        let keys = self.redis.keys(&refresh_token_pattern(user_id)).await?;
        let mut revoked = 0;

        for key in keys {
            if let Some(record) = self.redis.get::<RefreshTokenRecord>(&key).await? {
                if !record.revoked {
                    self.revoke(&record).await?;
                    revoked += 1;
                }
            }
        }

        log::info!("사용자 리프레시 토큰 일괄 폐기 - user_id: {}, {}개", user_id, revoked);
        Ok(revoked)
    }

    /// 사용자 삭제 시 토큰 레코드를 모두 제거합니다.
    pub async fn delete_all(&self, user_id: &str) -> Result<usize, AppError> {
        let keys = self.redis.keys(&refresh_token_pattern(user_id)).await?;
        let count = keys.len();
        self.redis.del_multiple(&keys).await?;

        let claims = self.redis.keys(&refresh_claim_pattern(user_id)).await?;
        self.redis.del_multiple(&claims).await?;
        Ok(count)
    }
}

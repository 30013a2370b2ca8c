//! 리프레시 토큰 레코드
//!
//! Redis `refresh_token:{user_id}:{jti}` 키에 JSON으로 저장됩니다.
//! 원문 토큰 대신 SHA-256 해시만 보관하며, 회전(rotation) 후에도 레코드를
//! `revoked = true`로 만료 시각까지 남겨두어 재사용을 감지합니다.
//!
//! 회전 시에는 `refresh_used:{user_id}:{jti}` 키를 `SET NX`로 먼저 선점합니다.
//! 같은 토큰으로 동시에 들어온 요청 중 하나만 새 토큰을 받습니다.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const REFRESH_TOKEN_KEY_PREFIX: &str = "refresh_token";
pub const REFRESH_CLAIM_KEY_PREFIX: &str = "refresh_used";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub user_id: String,
    pub jti: String,
    pub token_hash: String,
    /// 발급 시각 (Unix seconds)
    pub issued_at: i64,
    /// 만료 시각 (Unix seconds)
    pub expires_at: i64,
    pub revoked: bool,
}

impl RefreshTokenRecord {
    pub fn new(user_id: &str, jti: &str, refresh_token: &str, issued_at: i64, expires_at: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            jti: jti.to_string(),
            token_hash: hash_token(refresh_token),
            issued_at,
            expires_at,
            revoked: false,
        }
    }

    pub fn redis_key(&self) -> String {
        refresh_token_key(&self.user_id, &self.jti)
    }

    pub fn claim_key(&self) -> String {
        refresh_claim_key(&self.user_id, &self.jti)
    }

    /// 제시된 토큰 원문이 저장된 해시와 같은지 확인합니다.
    pub fn matches(&self, refresh_token: &str) -> bool {
        self.token_hash == hash_token(refresh_token)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// 남은 수명(초). 최소 1초입니다.
    pub fn ttl_seconds(&self, now: i64) -> u64 {
        (self.expires_at - now).max(1) as u64
    }
}

/// `refresh_token:{user_id}:{jti}`
pub fn refresh_token_key(user_id: &str, jti: &str) -> String {
    format!("{}:{}:{}", REFRESH_TOKEN_KEY_PREFIX, user_id, jti)
}

/// 사용자의 모든 리프레시 토큰 키 패턴
pub fn refresh_token_pattern(user_id: &str) -> String {
    format!("{}:{}:*", REFRESH_TOKEN_KEY_PREFIX, user_id)
}

/// `refresh_used:{user_id}:{jti}`. 회전에 한 번 사용된 토큰 표시
pub fn refresh_claim_key(user_id: &str, jti: &str) -> String {
    format!("{}:{}:{}", REFRESH_CLAIM_KEY_PREFIX, user_id, jti)
}

pub fn refresh_claim_pattern(user_id: &str) -> String {
    format!("{}:{}:*", REFRESH_CLAIM_KEY_PREFIX, user_id)
}

/// 토큰 원문의 SHA-256 hex
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

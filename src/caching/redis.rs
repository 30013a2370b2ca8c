//! # Redis 클라이언트
//!
//! 리포지토리 캐시와 리프레시 토큰 레코드 저장에 사용하는 Redis 래퍼입니다.
//! 값은 JSON 문자열로 직렬화하여 저장합니다.
//!
//! `#[repository]` 매크로는 `redis` 필드에 이 타입을 자동 주입하고,
//! `invalidate_cache()` 등에서 `del`, `keys`, `del_multiple`을 사용합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::env;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn serde_error(context: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, e.to_string()))
}

impl RedisClient {
    /// 연결을 생성하고 `PING`으로 접속을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::open(redis_url())?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| serde_error("Deserialization failed", e)),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_error("Serialization failed", e))?;
        conn.set(key, json).await
    }

    /// 만료 시간(초)과 함께 저장합니다. 0초는 1초로 올려서 저장합니다.
    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_error("Serialization failed", e))?;
        conn.set_ex(key, json, seconds.max(1)).await
    }

    /// 키가 없을 때만 만료 시간과 함께 저장합니다 (`SET NX EX`).
    ///
    /// 저장했으면 `true`, 이미 키가 있으면 `false`입니다.
    pub async fn set_if_absent<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_error("Serialization failed", e))?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("NX")
            .arg("EX")
            .arg(seconds.max(1))
            .query_async(&mut conn)
            .await?;

        Ok(reply.is_some())
    }

    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.exists(key).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}

impl Default for RedisClient {
    /// 접속 확인 없이 클라이언트만 생성합니다. URL 형식이 잘못되면 패닉합니다.
    fn default() -> Self {
        let client = Client::open(redis_url())
            .expect("Failed to create Redis client with default configuration");

        Self { client }
    }
}

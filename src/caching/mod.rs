//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 JSON 캐시와 키-값 저장소를 제공합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("game_repository:6650f0c2", &game, 600).await?;
//!
//! let cached: Option<Game> = cache.get("game_repository:6650f0c2").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;

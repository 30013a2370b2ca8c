//! # Authentication Configuration Module
//!
//! JWT 액세스/리프레시 토큰 발급에 필요한 설정을 관리합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_EXPIRATION_MINUTES="15"
//! export JWT_REFRESH_EXPIRATION_DAYS="7"
//! export JWT_ISSUER="game-lending-service"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::JwtConfig;
//!
//! let secret = JwtConfig::secret();
//! let access_ttl = chrono::Duration::minutes(JwtConfig::access_expiration_minutes());
//! ```

use std::env;

/// JWT 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    /// HS256 서명 키
    ///
    /// 설정되지 않았다면 경고를 남기고 개발용 기본값을 사용합니다.
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "game-lending-dev-secret".to_string()
            })
    }

    pub fn access_expiration_minutes() -> i64 {
        env::var("JWT_ACCESS_EXPIRATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &i64| *v > 0)
            .unwrap_or(15)
    }

    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v: &i64| *v > 0)
            .unwrap_or(7)
    }

    pub fn issuer() -> String {
        env::var("JWT_ISSUER").unwrap_or_else(|_| "game-lending-service".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        if env::var("JWT_ACCESS_EXPIRATION_MINUTES").is_err() {
            assert_eq!(JwtConfig::access_expiration_minutes(), 15);
        }
        if env::var("JWT_REFRESH_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::refresh_expiration_days(), 7);
        }
        if env::var("JWT_ISSUER").is_err() {
            assert_eq!(JwtConfig::issuer(), "game-lending-service");
        }
    }

    #[test]
    fn test_secret_is_never_empty() {
        assert!(!JwtConfig::secret().is_empty());
    }
}

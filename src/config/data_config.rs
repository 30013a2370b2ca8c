//! # 서버 / 데이터 설정 모듈
//!
//! 실행 환경, 서버 바인딩, 비밀번호 해싱, 파일 저장소, 요청 제한,
//! 대여 기간 정책을 환경 변수에서 읽어오는 설정 모듈입니다.
//!
//! 모든 설정은 `struct XConfig;` 형태의 단위 구조체에 연관 함수로 노출되며,
//! 환경 변수가 없거나 파싱에 실패하면 기본값을 사용합니다.
//!
//! ## 환경 변수
//!
//! | 변수 | 기본값 | 설명 |
//! |------|--------|------|
//! | `ENVIRONMENT` | `production` | 실행 환경 |
//! | `BCRYPT_COST` | 환경별 | bcrypt cost (4..=15) |
//! | `HOST` / `PORT` | `127.0.0.1` / `8080` | 바인딩 주소 |
//! | `SERVER_WORKERS` | `4` | actix 워커 수 |
//! | `UPLOAD_DIR` | `./uploads` | 업로드 파일 루트 |
//! | `MAX_UPLOAD_BYTES` | `10485760` | 업로드 최대 크기 |
//! | `ALLOWED_CONTENT_TYPES` | 이미지/PDF/텍스트 | 콤마 구분 MIME 목록 |
//! | `RATE_LIMIT_PER_SECOND` / `RATE_LIMIT_BURST_SIZE` | `100` / `200` | 요청 제한 |
//! | `LOAN_DEFAULT_DAYS` / `LOAN_MAX_DAYS` | `14` / `90` | 대여 기간 |

use std::env;
use std::str::FromStr;
use log::error;

/// 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수에서 현재 환경을 결정합니다.
    pub fn current() -> Self {
        let value = env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string());
        Self::from_str(&value)
    }

    /// 문자열을 환경으로 변환합니다. 알 수 없는 값은 `Production`으로 취급합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// `BCRYPT_COST`가 4..=15 범위의 정수이면 그대로 사용하고,
    /// 아니면 환경별 기본값을 반환합니다.
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        parse_env_or("PORT", 8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn workers() -> usize {
        parse_env_or::<usize>("SERVER_WORKERS", 4).max(1)
    }

    /// `host:port` 형태의 바인딩 주소
    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// 업로드 파일 저장소 설정
pub struct StorageConfig;

impl StorageConfig {
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

    const DEFAULT_CONTENT_TYPES: [&'static str; 6] = [
        "image/png",
        "image/jpeg",
        "image/gif",
        "image/webp",
        "application/pdf",
        "text/plain",
    ];

    pub fn upload_dir() -> String {
        env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string())
    }

    pub fn max_upload_bytes() -> usize {
        parse_env_or("MAX_UPLOAD_BYTES", Self::DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// 업로드를 허용하는 MIME 타입 목록 (`ALLOWED_CONTENT_TYPES`, 콤마 구분)
    pub fn allowed_content_types() -> Vec<String> {
        match env::var("ALLOWED_CONTENT_TYPES") {
            Ok(raw) => Self::parse_content_types(&raw),
            Err(_) => Self::DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn parse_content_types(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn load() -> Self {
        Self {
            per_second: parse_env_or("RATE_LIMIT_PER_SECOND", 100),
            burst_size: parse_env_or("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

/// 대여 기간 정책
pub struct LoanConfig;

impl LoanConfig {
    pub fn default_loan_days() -> i64 {
        parse_env_or("LOAN_DEFAULT_DAYS", 14)
    }

    pub fn max_loan_days() -> i64 {
        parse_env_or("LOAN_MAX_DAYS", 90)
    }
}

/// 환경 변수를 파싱하고, 값이 없거나 잘못되면 기본값을 반환합니다.
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("DEV"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
        assert!(Environment::from_str("prod").is_production());
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }
        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "127.0.0.1");
        }
        if env::var("SERVER_WORKERS").is_err() {
            assert_eq!(ServerConfig::workers(), 4);
        }
    }

    #[test]
    fn test_loan_config_defaults() {
        if env::var("LOAN_DEFAULT_DAYS").is_err() {
            assert_eq!(LoanConfig::default_loan_days(), 14);
        }
        if env::var("LOAN_MAX_DAYS").is_err() {
            assert_eq!(LoanConfig::max_loan_days(), 90);
        }
    }

    #[test]
    fn test_parse_content_types() {
        let types = StorageConfig::parse_content_types(" image/PNG, application/pdf ,,");
        assert_eq!(types, vec!["image/png".to_string(), "application/pdf".to_string()]);
    }

    #[test]
    fn test_parse_env_or_falls_back_on_missing_key() {
        let value: u64 = parse_env_or("GAME_LENDING_TEST_SURELY_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }
}

//! JWT 발급/검증 서비스
//!
//! HS256 서명, `iss` 검증, `token_type` 클레임으로 액세스/리프레시 토큰을 구분합니다.
//! 실제 로직은 설정값을 인자로 받는 순수 함수(`issue_tokens`, `decode_token`)에 있고,
//! `TokenService`는 환경 설정을 읽어 위임합니다.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use uuid::Uuid;
use crate::{
    config::JwtConfig,
    domain::entities::users::user::User,
    domain::models::token::{TokenClaims, TokenPair, TokenType},
    errors::AppError,
};

/// 토큰 발급/검증에 필요한 설정 묶음
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_seconds: i64,
}

impl JwtSettings {
    pub fn from_config() -> Self {
        Self {
            secret: JwtConfig::secret(),
            issuer: JwtConfig::issuer(),
            access_ttl_seconds: JwtConfig::access_expiration_minutes() * 60,
            refresh_ttl_seconds: JwtConfig::refresh_expiration_days() * 24 * 3600,
        }
    }
}

/// 발급 결과. 리프레시 토큰 클레임은 Redis 레코드 생성에 사용됩니다.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub pair: TokenPair,
    pub refresh_claims: TokenClaims,
}

fn sign(claims: &TokenClaims, secret: &str) -> Result<String, AppError> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

/// 액세스/리프레시 토큰 쌍을 발급합니다. `now`는 Unix seconds입니다.
pub fn issue_tokens(
    user_id: &str,
    roles: &[String],
    settings: &JwtSettings,
    now: i64,
) -> Result<IssuedTokens, AppError> {
    let claims_for = |token_type: TokenType, ttl: i64| TokenClaims {
        sub: user_id.to_string(),
        roles: roles.to_vec(),
        token_type,
        jti: Uuid::new_v4().to_string(),
        iss: settings.issuer.clone(),
        iat: now,
        exp: now + ttl,
    };

    let access_claims = claims_for(TokenType::Access, settings.access_ttl_seconds);
    let refresh_claims = claims_for(TokenType::Refresh, settings.refresh_ttl_seconds);

    let pair = TokenPair {
        access_token: sign(&access_claims, &settings.secret)?,
        refresh_token: sign(&refresh_claims, &settings.secret)?,
        token_type: "Bearer".to_string(),
        expires_in: settings.access_ttl_seconds,
        refresh_expires_in: settings.refresh_ttl_seconds,
    };

    Ok(IssuedTokens { pair, refresh_claims })
}

/// 서명/만료/발급자/용도를 검증하고 클레임을 반환합니다.
///
/// 모든 실패는 `AppError::AuthenticationError`(401)입니다.
pub fn decode_token(token: &str, settings: &JwtSettings, expected: TokenType) -> Result<TokenClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.leeway = 0;

    let claims = decode::<TokenClaims>(token, &DecodingKey::from_secret(settings.secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            }
            ErrorKind::InvalidIssuer => {
                AppError::AuthenticationError("발급자가 올바르지 않은 토큰입니다".to_string())
            }
            _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
        })?;

    if claims.token_type != expected {
        return Err(AppError::AuthenticationError("토큰 용도가 올바르지 않습니다".to_string()));
    }

    Ok(claims)
}

/// `Authorization` 헤더 값에서 Bearer 토큰을 꺼냅니다. 스킴은 대소문자를 구분하지 않습니다.
pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    let invalid = || AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string());

    let (scheme, token) = auth_header.trim().split_once(' ').ok_or_else(invalid)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(invalid());
    }

    Ok(token)
}

#[service(name = "token")]
pub struct TokenService {}

impl TokenService {
    pub fn generate_token_pair(&self, user: &User) -> Result<IssuedTokens, AppError> {
        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?;

        issue_tokens(&user_id, &user.role_names(), &JwtSettings::from_config(), Utc::now().timestamp())
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_token(token, &JwtSettings::from_config(), TokenType::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_token(token, &JwtSettings::from_config(), TokenType::Refresh)
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        extract_bearer_token(auth_header)
    }
}

use serde::{Deserialize, Serialize};

/// 토큰 용도. 액세스 토큰 자리에 리프레시 토큰을 쓰는 것을 막기 위해 클레임에 포함됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (ObjectId hex)
    pub sub: String,
    pub roles: Vec<String>,
    pub token_type: TokenType,
    /// 토큰 고유 ID (UUID v4)
    pub jti: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// 발급된 액세스/리프레시 토큰 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// 액세스 토큰 수명 (초)
    pub expires_in: i64,
    /// 리프레시 토큰 수명 (초)
    #[serde(default)]
    pub refresh_expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_wire_format() {
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }

    #[test]
    fn test_token_pair_defaults_when_fields_missing() {
        let pair: TokenPair = serde_json::from_str(
            r#"{"access_token": "a", "refresh_token": "r", "expires_in": 900}"#,
        ).unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.refresh_expires_in, 0);
    }
}

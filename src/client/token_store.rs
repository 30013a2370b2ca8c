use std::sync::RwLock;
use crate::domain::models::token::TokenPair;

/// 클라이언트 측 토큰 보관소
///
/// 여러 요청이 동시에 읽고, 리프레시 시 한 곳에서만 교체합니다.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn save(&self, pair: &TokenPair);
    fn clear(&self);
}

/// 프로세스 메모리에만 토큰을 두는 기본 구현
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(pair: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(pair)),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&TokenPair) -> T) -> Option<T> {
        let guard = self.tokens.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().map(f)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.read(|pair| pair.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(|pair| pair.refresh_token.clone())
    }

    fn save(&self, pair: &TokenPair) {
        let mut guard = self.tokens.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(pair.clone());
    }

    fn clear(&self) {
        let mut guard = self.tokens.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
            refresh_expires_in: 604_800,
        }
    }

    #[test]
    fn test_save_and_clear() {
        let store = InMemoryTokenStore::new();
        assert!(store.access_token().is_none());

        store.save(&pair("a1", "r1"));
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.save(&pair("a2", "r2"));
        assert_eq!(store.access_token().as_deref(), Some("a2"));

        store.clear();
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }
}

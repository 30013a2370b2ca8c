//! 401 응답 시 토큰을 갱신하는 인증기
//!
//! 동시에 여러 요청이 401을 받아도 네트워크 리프레시는 한 번만 일어납니다.
//!
//! 1. 실패한 요청의 토큰이 이미 저장된 토큰과 다르면 (다른 요청이 갱신함) 저장된 토큰으로 재시도
//! 2. 아니면 잠금을 잡고 같은 검사를 한 번 더 수행
//! 3. 그래도 같으면 리프레시 토큰으로 갱신. 실패 시 저장소를 비우고 재인증 요구

use std::sync::Arc;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tokio::sync::Mutex;
use crate::client::error::ClientError;
use crate::client::token_store::TokenStore;
use crate::domain::models::token::TokenPair;

#[async_trait]
pub trait RefreshTransport: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError>;
}

/// `POST {base}/api/auth/refresh` 호출
pub struct HttpRefreshTransport {
    client: Client,
    base_url: String,
}

impl HttpRefreshTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        let response = self.client
            .post(format!("{}/api/auth/refresh", self.base_url))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response_body(status, &body));
        }

        Ok(response.json::<TokenPair>().await?)
    }
}

pub struct TokenAuthenticator {
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn RefreshTransport>,
    refresh_lock: Mutex<()>,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn TokenStore>, transport: Arc<dyn RefreshTransport>) -> Self {
        Self {
            store,
            transport,
            refresh_lock: Mutex::new(()),
        }
    }

    /// 401을 받은 요청의 토큰(`failed_token`)을 받아 재시도에 쓸 액세스 토큰을 돌려줍니다.
    pub async fn authenticate(&self, failed_token: Option<&str>) -> Result<String, ClientError> {
        if let Some(current) = self.replaced_token(failed_token) {
            return Ok(current);
        }

        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.replaced_token(failed_token) {
            log::debug!("다른 요청이 이미 토큰을 갱신함, 갱신된 토큰으로 재시도");
            return Ok(current);
        }

        let Some(refresh_token) = self.store.refresh_token() else {
            self.store.clear();
            return Err(ClientError::ReauthenticationRequired);
        };

        match self.transport.refresh(&refresh_token).await {
            Ok(pair) => {
                self.store.save(&pair);
                log::info!("🔄 액세스 토큰 갱신 완료");
                Ok(pair.access_token)
            }
            Err(e) => {
                log::warn!("토큰 갱신 실패, 저장된 토큰 삭제: {}", e);
                self.store.clear();
                Err(ClientError::ReauthenticationRequired)
            }
        }
    }

    /// 저장된 액세스 토큰이 실패한 토큰과 다르면 그 토큰을 반환합니다.
    fn replaced_token(&self, failed_token: Option<&str>) -> Option<String> {
        self.store
            .access_token()
            .filter(|current| Some(current.as_str()) != failed_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use futures_util::future::join_all;
    use crate::client::token_store::InMemoryTokenStore;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
            refresh_expires_in: 604_800,
        }
    }

    struct MockTransport {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockTransport {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail })
        }
    }

    #[async_trait]
    impl RefreshTransport for MockTransport {
        async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(20)).await;

            if self.fail {
                return Err(ClientError::Api {
                    status: 401,
                    code: "authentication_required".to_string(),
                    message: "expired".to_string(),
                });
            }
            Ok(pair(&format!("access-{}", n), &format!("{}-next", refresh_token)))
        }
    }

    fn authenticator(store: Arc<InMemoryTokenStore>, transport: Arc<MockTransport>) -> TokenAuthenticator {
        TokenAuthenticator::new(store, transport)
    }

    #[tokio::test]
    async fn test_stale_token_retries_without_refresh() {
        let store = Arc::new(InMemoryTokenStore::with_tokens(pair("fresh", "r1")));
        let transport = MockTransport::new(false);
        let auth = authenticator(store, transport.clone());

        let token = auth.authenticate(Some("stale")).await.unwrap();

        assert_eq!(token, "fresh");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refreshes_and_persists_rotated_tokens() {
        let store = Arc::new(InMemoryTokenStore::with_tokens(pair("old", "r1")));
        let transport = MockTransport::new(false);
        let auth = authenticator(store.clone(), transport.clone());

        let token = auth.authenticate(Some("old")).await.unwrap();

        assert_eq!(token, "access-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1-next"));
    }

    #[tokio::test]
    async fn test_concurrent_401s_refresh_once() {
        let store = Arc::new(InMemoryTokenStore::with_tokens(pair("old", "r1")));
        let transport = MockTransport::new(false);
        let auth = authenticator(store, transport.clone());

        let results = join_all((0..8).map(|_| auth.authenticate(Some("old")))).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        for result in results {
            assert_eq!(result.unwrap(), "access-1");
        }
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_store() {
        let store = Arc::new(InMemoryTokenStore::with_tokens(pair("old", "r1")));
        let transport = MockTransport::new(true);
        let auth = authenticator(store.clone(), transport.clone());

        let results = join_all((0..3).map(|_| auth.authenticate(Some("old")))).await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| matches!(r, Err(ClientError::ReauthenticationRequired))));
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_requires_login() {
        let store = Arc::new(InMemoryTokenStore::new());
        let transport = MockTransport::new(false);
        let auth = authenticator(store, transport.clone());

        let result = auth.authenticate(None).await;

        assert!(matches!(result, Err(ClientError::ReauthenticationRequired)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}

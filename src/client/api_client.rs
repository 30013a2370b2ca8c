//! 게임 대여 API용 타입 클라이언트
//!
//! 인증이 필요한 호출은 모두 `send_authenticated`를 거치며, 401을 받으면
//! [`TokenAuthenticator`]로 토큰을 갱신한 뒤 정확히 한 번 재시도합니다.
//!
//! ```rust,ignore
//! let client = LendingApiClient::new("http://localhost:8080");
//! client.login("user@example.com", "password123").await?;
//! let games = client.list_games(&GameListQuery::default()).await?;
//! ```

use std::sync::Arc;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use crate::client::authenticator::{HttpRefreshTransport, RefreshTransport, TokenAuthenticator};
use crate::client::error::ClientError;
use crate::client::token_store::{InMemoryTokenStore, TokenStore};
use crate::domain::dto::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::domain::dto::common::PageResponse;
use crate::domain::dto::games::{CreateGameRequest, GameListQuery, GameResponse, UpdateGameRequest};
use crate::domain::dto::loans::{CreateLoanRequest, LoanResponse};

pub struct LendingApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    authenticator: TokenAuthenticator,
}

impl LendingApiClient {
    /// 메모리 토큰 저장소와 HTTP 리프레시를 사용하는 클라이언트
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::new();
        let base_url = base_url.into();
        let transport = Arc::new(HttpRefreshTransport::new(http.clone(), base_url.clone()));
        Self::with_parts(http, base_url, Arc::new(InMemoryTokenStore::new()), transport)
    }

    pub fn with_parts(
        http: Client,
        base_url: impl Into<String>,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn RefreshTransport>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authenticator: TokenAuthenticator::new(store.clone(), transport),
            store,
        }
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ===== 인증 =====

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/api/auth/login")).json(&request).send().await?;
        let auth: AuthResponse = read_json(response).await?;

        self.store.save(&auth.tokens);
        Ok(auth)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response = self.http.post(self.url("/api/auth/register")).json(request).send().await?;
        let auth: AuthResponse = read_json(response).await?;

        self.store.save(&auth.tokens);
        Ok(auth)
    }

    /// 현재 리프레시 토큰을 폐기합니다. 서버 응답과 관계없이 로컬 토큰은 삭제됩니다.
    ///
    /// 재시도 전에 토큰이 회전될 수 있으므로 본문은 시도할 때마다 저장소에서 다시 읽습니다.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.url("/api/auth/logout");

        let result = self
            .send_authenticated(|http| {
                http.post(&url).json(&json!({ "refresh_token": self.store.refresh_token() }))
            })
            .await;

        self.store.clear();
        expect_success(result?).await
    }

    // ===== 게임 =====

    pub async fn list_games(&self, query: &GameListQuery) -> Result<PageResponse<GameResponse>, ClientError> {
        let url = self.url("/api/games");
        let response = self.send_authenticated(|http| http.get(&url).query(query)).await?;
        read_json(response).await
    }

    pub async fn get_game(&self, id: &str) -> Result<GameResponse, ClientError> {
        let url = self.url(&format!("/api/games/{}", id));
        let response = self.send_authenticated(|http| http.get(&url)).await?;
        read_json(response).await
    }

    pub async fn create_game(&self, request: &CreateGameRequest) -> Result<GameResponse, ClientError> {
        let url = self.url("/api/games");
        let response = self.send_authenticated(|http| http.post(&url).json(request)).await?;
        read_json(response).await
    }

    pub async fn update_game(&self, id: &str, request: &UpdateGameRequest) -> Result<GameResponse, ClientError> {
        let url = self.url(&format!("/api/games/{}", id));
        let response = self.send_authenticated(|http| http.put(&url).json(request)).await?;
        read_json(response).await
    }

    pub async fn delete_game(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/games/{}", id));
        let response = self.send_authenticated(|http| http.delete(&url)).await?;
        expect_success(response).await
    }

    pub async fn upload_game_image(
        &self,
        id: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<GameResponse, ClientError> {
        let url = self.url(&format!("/api/games/{}/image", id));
        let response = self
            .send_authenticated(|http| {
                http.put(&url)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(bytes.clone())
            })
            .await?;
        read_json(response).await
    }

    pub async fn download_game_image(&self, id: &str) -> Result<Vec<u8>, ClientError> {
        let url = self.url(&format!("/api/games/{}/image", id));
        let response = self.send_authenticated(|http| http.get(&url)).await?;
        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ===== 대여 =====

    pub async fn request_loan(&self, request: &CreateLoanRequest) -> Result<LoanResponse, ClientError> {
        let url = self.url("/api/loans");
        let response = self.send_authenticated(|http| http.post(&url).json(request)).await?;
        read_json(response).await
    }

    pub async fn return_loan(&self, id: &str) -> Result<LoanResponse, ClientError> {
        let url = self.url(&format!("/api/loans/{}/return", id));
        let response = self.send_authenticated(|http| http.post(&url)).await?;
        read_json(response).await
    }

    pub async fn borrowed_loans(&self) -> Result<Vec<LoanResponse>, ClientError> {
        let url = self.url("/api/loans/borrowed");
        let response = self.send_authenticated(|http| http.get(&url)).await?;
        read_json(response).await
    }

    pub async fn lent_loans(&self) -> Result<Vec<LoanResponse>, ClientError> {
        let url = self.url("/api/loans/lent");
        let response = self.send_authenticated(|http| http.get(&url)).await?;
        read_json(response).await
    }

    /// 저장된 액세스 토큰으로 요청하고, 401이면 토큰을 갱신해 한 번만 재시도합니다.
    ///
    /// 요청 본문은 재시도 시 다시 만들어야 하므로 빌더 함수를 받습니다.
    async fn send_authenticated<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self.store.access_token();

        let mut request = build(&self.http);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let retry_token = self.authenticator.authenticate(token.as_deref()).await?;
        Ok(build(&self.http).bearer_auth(retry_token).send().await?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::from_response_body(status, &body))
}

async fn expect_success(response: Response) -> Result<(), ClientError> {
    ensure_success(response).await.map(|_| ())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(ensure_success(response).await?.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use crate::domain::models::token::TokenPair;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 900,
            refresh_expires_in: 604_800,
        }
    }

    /// 테스트용 서버 상태. `new-access`만 유효한 토큰으로 받아들입니다.
    #[derive(Default)]
    struct FakeServer {
        reject_all: bool,
        refresh_fails: bool,
        refresh_calls: AtomicUsize,
        bearers: Mutex<Vec<String>>,
        logout_bodies: Mutex<Vec<serde_json::Value>>,
    }

    fn bearer(req: &HttpRequest) -> String {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .trim_start_matches("Bearer ")
            .to_string()
    }

    fn unauthorized() -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({
            "error": "authentication_required",
            "message": "토큰이 만료되었습니다"
        }))
    }

    async fn refresh(state: web::Data<FakeServer>) -> HttpResponse {
        state.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if state.refresh_fails {
            return unauthorized();
        }
        HttpResponse::Ok().json(pair("new-access", "new-refresh"))
    }

    async fn logout(state: web::Data<FakeServer>, req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
        let token = bearer(&req);
        state.bearers.lock().unwrap().push(token.clone());
        state.logout_bodies.lock().unwrap().push(body.into_inner());

        if token == "new-access" {
            HttpResponse::NoContent().finish()
        } else {
            unauthorized()
        }
    }

    async fn borrowed(state: web::Data<FakeServer>, req: HttpRequest) -> HttpResponse {
        let token = bearer(&req);
        state.bearers.lock().unwrap().push(token.clone());

        if state.reject_all || token != "new-access" {
            return unauthorized();
        }
        HttpResponse::Ok().json(json!([]))
    }

    /// 임의 포트에 서버를 띄우고, `old-access`/`old-refresh`를 가진 클라이언트를 돌려줍니다.
    async fn start(server: FakeServer) -> (LendingApiClient, web::Data<FakeServer>) {
        let state = web::Data::new(server);
        let data = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/api/auth/refresh", web::post().to(refresh))
                .route("/api/auth/logout", web::post().to(logout))
                .route("/api/loans/borrowed", web::get().to(borrowed))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        let client = LendingApiClient::new(format!("http://{}", addr));
        client.token_store().save(&pair("old-access", "old-refresh"));
        (client, state)
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = LendingApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/games"), "http://localhost:8080/api/games");
    }

    #[test]
    fn test_client_shares_store_with_authenticator() {
        let client = LendingApiClient::new("http://localhost:8080");
        client.token_store().save(&pair("a", "r"));

        assert_eq!(client.token_store().access_token().as_deref(), Some("a"));
    }

    #[actix_web::test]
    async fn test_401_is_retried_once_with_refreshed_token() {
        let (client, state) = start(FakeServer::default()).await;

        let loans = client.borrowed_loans().await.unwrap();

        assert!(loans.is_empty());
        assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*state.bearers.lock().unwrap(), vec!["old-access", "new-access"]);
        assert_eq!(client.token_store().access_token().as_deref(), Some("new-access"));
        assert_eq!(client.token_store().refresh_token().as_deref(), Some("new-refresh"));
    }

    #[actix_web::test]
    async fn test_second_401_is_returned_without_another_refresh() {
        let (client, state) = start(FakeServer { reject_all: true, ..Default::default() }).await;
        let url = client.url("/api/loans/borrowed");

        let response = client.send_authenticated(|http| http.get(&url)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.bearers.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_failed_refresh_requires_reauthentication() {
        let (client, state) = start(FakeServer { refresh_fails: true, ..Default::default() }).await;

        let result = client.borrowed_loans().await;

        assert!(matches!(result, Err(ClientError::ReauthenticationRequired)));
        assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.bearers.lock().unwrap().len(), 1);
        assert!(client.token_store().access_token().is_none());
        assert!(client.token_store().refresh_token().is_none());
    }

    #[actix_web::test]
    async fn test_logout_retry_sends_rotated_refresh_token() {
        let (client, state) = start(FakeServer::default()).await;

        client.logout().await.unwrap();

        let bodies = state.logout_bodies.lock().unwrap().clone();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0]["refresh_token"], "old-refresh");
        assert_eq!(bodies[1]["refresh_token"], "new-refresh");
        assert!(client.token_store().refresh_token().is_none());
    }
}

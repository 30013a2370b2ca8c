//! 게임 대여 API 클라이언트
//!
//! - [`api_client`]: reqwest 기반 타입 클라이언트
//! - [`authenticator`]: 401 시 단일 리프레시(single-flight) 토큰 갱신
//! - [`token_store`]: 액세스/리프레시 토큰 보관
//! - [`error`]: 클라이언트 에러

pub mod api_client;
pub mod authenticator;
pub mod error;
pub mod token_store;

pub use api_client::LendingApiClient;
pub use authenticator::{HttpRefreshTransport, RefreshTransport, TokenAuthenticator};
pub use error::ClientError;
pub use token_store::{InMemoryTokenStore, TokenStore};

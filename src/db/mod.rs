//! # MongoDB 연결 모듈
//!
//! 애플리케이션 전역에서 공유하는 MongoDB 클라이언트 래퍼입니다.
//! `main.rs`에서 한 번 생성해 `ServiceLocator::set()`으로 등록하면,
//! `#[repository]` 매크로가 `db` 필드에 자동으로 주입합니다.
//!
//! ## 환경 변수
//!
//! - `MONGODB_URI` (기본값: `mongodb://localhost:27017`)
//! - `DATABASE_NAME` (기본값: `game_lending_dev`)

use mongodb::{Client, options::ClientOptions};
use std::env;
use log::info;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 연결을 생성하고 `ping` 명령으로 접속을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "game_lending_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("game_lending_service".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

//! 게임 대여 서비스 메인 애플리케이션
//!
//! MongoDB, Redis, 로컬 파일 저장소를 준비하고 ServiceLocator에 등록한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use game_lending_service::caching::redis::RedisClient;
use game_lending_service::config::{RateLimitConfig, ServerConfig};
use game_lending_service::core::registry::ServiceLocator;
use game_lending_service::db::Database;
use game_lending_service::repositories;
use game_lending_service::routes::{configure_all_routes, ENDPOINTS};
use game_lending_service::storage::FileStorage;
use game_lending_service::utils::display_terminal::print_endpoint_table;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 게임 대여 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;
    let storage = FileStorage::from_config().await.map_err(io::Error::other)?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);
    ServiceLocator::set(Arc::new(storage));

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    // 인덱스 생성 실패는 기동을 막지 않습니다
    if let Err(e) = repositories::create_all_indexes().await {
        error!("인덱스 생성 실패: {}", e);
    }

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 요청 로깅, 경로 정규화 미들웨어를 적용합니다.
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    let rate_limit_config = RateLimitConfig::load();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    print_endpoint_table(&bind_address, ENDPOINTS);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
        .bind(&bind_address)?
        .workers(ServerConfig::workers())
        .run()
        .await
}

/// PROFILE 환경변수에 따라 `.env.dev` / `.env.prod` / `.env`를 로드합니다
///
/// ```bash
/// PROFILE=prod cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ".env.prod"),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ".env.dev"),
        _ => dotenv().map(|_| ".env"),
    };

    // 로거 초기화 전이므로 표준 에러로 출력합니다
    match loaded {
        Ok(file) => eprintln!("[{}] {} 파일 로드 됨", profile, file),
        Err(e) => eprintln!("[{}] 환경 파일 로드 실패: {}", profile, e),
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=info")
///
/// ```bash
/// RUST_LOG=game_lending_service::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// MongoDB와 Redis 연결을 초기화합니다
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

/// 프론트엔드 개발 서버와의 통신을 위한 CORS 설정
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
        ])
        .expose_headers(vec![header::CONTENT_DISPOSITION, header::ETAG])
        .supports_credentials()
        .max_age(3600)
}

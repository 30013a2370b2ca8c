//! 게임 대여 서비스
//!
//! 사용자끼리 비디오 게임을 빌려주고 돌려받는 과정을 관리하는 JWT 기반 REST 백엔드와,
//! 같은 API를 호출하는 클라이언트 라이브러리입니다.
//!
//! # Features
//!
//! - **사용자**: 회원가입, 프로필/아바타, 본인 또는 관리자 권한 검사
//! - **JWT 인증**: HS256 액세스/리프레시 토큰, 리프레시 토큰 교체(rotation)와 재사용 감지
//! - **게임**: 등록, 검색/페이지네이션, 대표 이미지
//! - **대여**: 조건부 상태 변경으로 중복 대여 방지, 반납, 연체 계산
//! - **문서**: 로컬 디스크 파일 저장, SHA-256 체크섬
//! - **클라이언트**: 401 시 한 번만 토큰을 갱신하는 인증기
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증 / 응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────┐
//! │ MongoDB + Redis + Disk  │ ← 저장소
//! └─────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use game_lending_service::services::games::GameService;
//!
//! let games = GameService::instance().list_games(query).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
pub mod storage;
pub mod client;

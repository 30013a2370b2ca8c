//! # Core Framework Module
//!
//! 게임 대여 서비스의 핵심 프레임워크 기능을 제공하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입 기반 싱글톤 조회 및 지연 생성
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 등록
//! - **의존성 해결**: `Arc<T>` 필드 자동 주입
//!
//! 에러 타입은 [`crate::errors`]에 정의되어 있으며 편의를 위해 이 모듈에서도 재노출합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! #[repository(name = "game", collection = "games")]
//! pub struct GameRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! #[service(name = "game")]
//! pub struct GameService {
//!     game_repo: Arc<GameRepository>,  // 자동 주입
//! }
//!
//! let game_service = GameService::instance();
//! ```
//!
//! ## 트러블슈팅
//!
//! ```text
//! panic: Service not found: LoanService. Make sure it's registered...
//! ```
//! **해결**: `#[service(name = "loan")]`처럼 구조체 이름과 일치하는 `name`을 지정했는지 확인

pub mod registry;

pub use registry::*;
pub use crate::errors::*;

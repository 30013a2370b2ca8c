//! # Domain Entities Module
//!
//! MongoDB 컬렉션(및 Redis 레코드)과 1:1로 대응되는 도메인 엔티티입니다.
//! 상태 전이와 대여 규칙처럼 저장소 없이 판단할 수 있는 비즈니스 규칙은
//! 엔티티 메서드나 순수 함수로 두어 서비스 계층과 테스트에서 함께 사용합니다.
//!
//! ```text
//! entities/
//! ├── users/      ← User, Role
//! ├── games/      ← Game, GameStatus
//! ├── loans/      ← Loan, LoanStatus, 대여 요청 검증
//! ├── documents/  ← Document, DocumentKind
//! └── tokens/     ← RefreshTokenRecord (Redis)
//! ```
//!
//! 엔티티 간 관계는 직접 참조 대신 `ObjectId`로 표현하며,
//! 참조 무결성(연쇄 삭제 등)은 서비스 계층이 책임집니다.

pub mod users;
pub mod games;
pub mod loans;
pub mod documents;
pub mod tokens;

pub use users::*;
pub use games::*;
pub use loans::*;
pub use documents::*;
pub use tokens::*;

//! 게임 엔티티
//!
//! 사용자가 대여용으로 등록한 게임 한 개를 나타냅니다.
//!
//! ## 상태 전이
//!
//! ```text
//!             (소유자 수정)
//!   AVAILABLE ◀──────────▶ UNAVAILABLE
//!      │  ▲
//! 대여 │  │ 반납
//!      ▼  │
//!   BORROWED
//! ```
//!
//! `BORROWED`로의 전이와 `BORROWED`에서의 전이는 대여/반납으로만 일어납니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Available,
    Borrowed,
    Unavailable,
}

impl GameStatus {
    /// BSON 필터에 사용하는 저장 값
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Available => "AVAILABLE",
            GameStatus::Borrowed => "BORROWED",
            GameStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub owner_id: ObjectId,
    pub title: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_document_id: Option<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Game {
    pub fn new(
        owner_id: ObjectId,
        title: String,
        platform: String,
        genre: Option<String>,
        description: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            owner_id,
            title,
            platform,
            genre,
            description,
            status: GameStatus::Available,
            image_document_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.owner_id == user_id
    }

    /// 대여 중인 게임은 정보를 수정할 수 없습니다.
    pub fn ensure_editable(&self) -> Result<(), AppError> {
        if self.status == GameStatus::Borrowed {
            return Err(AppError::ConflictError("대여 중인 게임은 수정할 수 없습니다".to_string()));
        }
        Ok(())
    }

    /// 대여 중인 게임은 삭제할 수 없습니다.
    pub fn ensure_deletable(&self) -> Result<(), AppError> {
        if self.status == GameStatus::Borrowed {
            return Err(AppError::ConflictError("대여 중인 게임은 삭제할 수 없습니다".to_string()));
        }
        Ok(())
    }

    /// 소유자가 직접 요청한 상태 변경을 검증합니다.
    ///
    /// `AVAILABLE` ↔ `UNAVAILABLE`만 허용합니다.
    pub fn validate_manual_status_change(&self, target: GameStatus) -> Result<(), AppError> {
        self.ensure_editable()?;

        if target == GameStatus::Borrowed {
            return Err(AppError::ValidationError(
                "BORROWED 상태는 대여 요청으로만 설정됩니다".to_string(),
            ));
        }
        Ok(())
    }
}

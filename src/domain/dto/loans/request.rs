use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

/// 대여 요청
///
/// `due_date`를 생략하면 `LOAN_DEFAULT_DAYS` 이후로 설정됩니다.
///
/// ```json
/// { "game_id": "665f1c...", "due_date": "2024-07-01T12:00:00Z", "notes": "주말에 돌려드릴게요" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLoanRequest {
    #[validate(length(equal = 24, message = "게임 ID 형식이 올바르지 않습니다"))]
    pub game_id: String,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 500, message = "메모는 500자 이하여야 합니다"))]
    pub notes: Option<String>,
}

impl CreateLoanRequest {
    pub fn due_date_bson(&self) -> Option<bson::DateTime> {
        self.due_date
            .map(|due| bson::DateTime::from_millis(due.timestamp_millis()))
    }
}

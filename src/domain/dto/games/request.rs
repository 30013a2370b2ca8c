use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::dto::common::PageQuery;
use crate::domain::entities::games::GameStatus;
use crate::utils::string_utils::deserialize_optional_string;

/// 게임 등록 요청. 소유자는 인증된 사용자로 설정됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 200, message = "제목은 1-200자 사이여야 합니다"))]
    pub title: String,

    #[validate(length(min = 1, max = 50, message = "플랫폼은 1-50자 사이여야 합니다"))]
    pub platform: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "장르는 50자 이하여야 합니다"))]
    pub genre: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000, message = "설명은 2000자 이하여야 합니다"))]
    pub description: Option<String>,
}

/// 게임 수정 요청. 지정된 필드만 변경됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGameRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 200, message = "제목은 1-200자 사이여야 합니다"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 50, message = "플랫폼은 1-50자 사이여야 합니다"))]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "장르는 50자 이하여야 합니다"))]
    pub genre: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000, message = "설명은 2000자 이하여야 합니다"))]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<GameStatus>,
}

impl UpdateGameRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.platform.is_none()
            && self.genre.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

/// `GET /api/games` 검색 쿼리
///
/// `q`는 제목 부분 일치(대소문자 무시) 검색어입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameListQuery {
    pub status: Option<GameStatus>,
    pub platform: Option<String>,
    pub owner_id: Option<String>,
    pub q: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl GameListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_game_validation() {
        let ok: CreateGameRequest = serde_json::from_str(
            r#"{"title": "Celeste", "platform": "PC", "genre": " "}"#,
        ).unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.genre.is_none());

        let bad = CreateGameRequest {
            title: String::new(),
            platform: "PC".to_string(),
            genre: None,
            description: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_game_status_parsing() {
        let req: UpdateGameRequest = serde_json::from_str(r#"{"status": "UNAVAILABLE"}"#).unwrap();
        assert_eq!(req.status, Some(GameStatus::Unavailable));
        assert!(!req.is_empty());

        assert!(UpdateGameRequest::default().is_empty());
    }
}

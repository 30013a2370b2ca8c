use serde::{Deserialize, Serialize};
use crate::domain::dto::common::to_rfc3339;
use crate::domain::entities::games::{Game, GameStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub platform: String,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub status: GameStatus,
    pub image_document_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            id: game.id.map(|id| id.to_hex()).unwrap_or_default(),
            owner_id: game.owner_id.to_hex(),
            title: game.title,
            platform: game.platform,
            genre: game.genre,
            description: game.description,
            status: game.status,
            image_document_id: game.image_document_id.map(|id| id.to_hex()),
            created_at: to_rfc3339(game.created_at),
            updated_at: to_rfc3339(game.updated_at),
        }
    }
}

//! 게임 서비스
//!
//! 게임 등록/조회/수정/삭제와 대표 이미지 관리를 담당합니다.
//! 삭제 시 대여 이력과 첨부 문서를 함께 지웁니다.

use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document as BsonDocument};
use singleton_macro::service;
use crate::{
    domain::dto::common::PageResponse,
    domain::dto::documents::{DocumentResponse, UploadCommand},
    domain::dto::games::{CreateGameRequest, GameListQuery, GameResponse, UpdateGameRequest},
    domain::dto::loans::LoanResponse,
    domain::entities::documents::{Document, DocumentKind},
    domain::entities::games::Game,
    domain::models::auth::AuthenticatedUser,
    errors::AppError,
    repositories::{games::{build_game_filter, GameRepository}, loans::LoanRepository},
    services::documents::DocumentService,
    utils::string_utils::{parse_object_id, validate_required_string},
};

/// 수정 요청을 `$set` 문서로 변환합니다.
///
/// 대여 중인 게임은 수정할 수 없고, 상태는 `AVAILABLE`/`UNAVAILABLE` 사이에서만 바뀝니다.
pub fn build_game_update(game: &Game, request: &UpdateGameRequest) -> Result<BsonDocument, AppError> {
    if request.is_empty() {
        return Err(AppError::ValidationError("변경할 항목이 없습니다".to_string()));
    }

    game.ensure_editable()?;

    let mut update = BsonDocument::new();

    if let Some(title) = &request.title {
        update.insert("title", validate_required_string(title, "제목")?);
    }
    if let Some(platform) = &request.platform {
        update.insert("platform", validate_required_string(platform, "플랫폼")?);
    }
    if let Some(genre) = &request.genre {
        update.insert("genre", genre.clone());
    }
    if let Some(description) = &request.description {
        update.insert("description", description.clone());
    }
    if let Some(status) = request.status {
        game.validate_manual_status_change(status)?;
        update.insert("status", status.as_str());
    }

    Ok(update)
}

/// 조건부 쓰기가 매칭되지 않은 경우. 읽은 뒤 대여가 시작됐거나 게임이 사라졌습니다.
fn borrowed_conflict() -> AppError {
    AppError::ConflictError("대여 중이거나 이미 삭제된 게임입니다".to_string())
}

#[service(name = "game")]
pub struct GameService {
    game_repo: Arc<GameRepository>,
    loan_repo: Arc<LoanRepository>,
    document_service: Arc<DocumentService>,
}

impl GameService {
    pub async fn create_game(&self, caller: &AuthenticatedUser, request: CreateGameRequest) -> Result<GameResponse, AppError> {
        let game = Game::new(
            caller.object_id()?,
            validate_required_string(&request.title, "제목")?,
            validate_required_string(&request.platform, "플랫폼")?,
            request.genre,
            request.description,
        );

        let created = self.game_repo.create(game).await?;
        log::info!("🎮 게임 등록 - id: {}, owner: {}", created.id_string().unwrap_or_default(), caller.user_id);

        Ok(GameResponse::from(created))
    }

    pub(crate) async fn find_game(&self, id: &ObjectId) -> Result<Game, AppError> {
        self.game_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("게임을 찾을 수 없습니다".to_string()))
    }

    pub async fn get_game(&self, id: &str) -> Result<GameResponse, AppError> {
        let id = parse_object_id(id, "게임 ID")?;
        Ok(GameResponse::from(self.find_game(&id).await?))
    }

    pub async fn list_games(&self, query: GameListQuery) -> Result<PageResponse<GameResponse>, AppError> {
        let filter = build_game_filter(&query)?;
        let page = query.page_query();

        let games = self.game_repo.find_page(filter.clone(), &page).await?;
        let total = self.game_repo.count(filter).await?;

        Ok(PageResponse::new(
            games.into_iter().map(GameResponse::from).collect(),
            &page,
            total,
        ))
    }

    pub async fn list_user_games(&self, owner_id: &str) -> Result<Vec<GameResponse>, AppError> {
        let owner_id = parse_object_id(owner_id, "사용자 ID")?;
        let games = self.game_repo.find_by_owner(&owner_id).await?;
        Ok(games.into_iter().map(GameResponse::from).collect())
    }

    pub async fn update_game(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        request: UpdateGameRequest,
    ) -> Result<GameResponse, AppError> {
        let id = parse_object_id(id, "게임 ID")?;
        let game = self.find_game(&id).await?;
        caller.ensure_can_act_for(&game.owner_id)?;

        let update = build_game_update(&game, &request)?;

        let updated = self.game_repo
            .update_unless_borrowed(&id, update)
            .await?
            .ok_or_else(borrowed_conflict)?;

        Ok(GameResponse::from(updated))
    }

    pub async fn delete_game(&self, caller: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let id = parse_object_id(id, "게임 ID")?;
        let game = self.find_game(&id).await?;
        caller.ensure_can_act_for(&game.owner_id)?;

        self.cascade_delete(&game).await
    }

    /// 게임을 조건부로 먼저 지운 뒤 대여 이력과 첨부 문서를 삭제합니다.
    async fn cascade_delete(&self, game: &Game) -> Result<(), AppError> {
        game.ensure_deletable()?;

        let id = game.id.ok_or_else(|| AppError::InternalError("게임 ID가 없습니다".to_string()))?;

        if !self.game_repo.delete_unless_borrowed(&id).await? {
            return Err(borrowed_conflict());
        }

        let loans = self.loan_repo.delete_by_game(&id).await?;
        let documents = self.document_service.delete_all_for_game(&id).await?;

        log::info!("🗑️ 게임 삭제 - id: {}, 대여 이력 {}건, 문서 {}건", id, loans, documents);
        Ok(())
    }

    /// 사용자 삭제 시 소유한 게임을 모두 삭제합니다. 대여 중인 게임이 있으면 409입니다.
    pub async fn delete_all_for_owner(&self, owner_id: &ObjectId) -> Result<usize, AppError> {
        let games = self.game_repo.find_by_owner(owner_id).await?;

        for game in &games {
            game.ensure_deletable()?;
        }
        for game in &games {
            self.cascade_delete(game).await?;
        }

        Ok(games.len())
    }

    /// 대표 이미지를 업로드하고 연결합니다. 기존 이미지는 삭제됩니다.
    pub async fn set_image(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        content_type: String,
        bytes: Vec<u8>,
    ) -> Result<GameResponse, AppError> {
        let game_id = parse_object_id(id, "게임 ID")?;
        let game = self.find_game(&game_id).await?;
        caller.ensure_can_act_for(&game.owner_id)?;

        let extension = crate::storage::extension_for_content_type(&content_type);
        let document = self.document_service
            .upload(caller, UploadCommand {
                game_id: Some(game_id.to_hex()),
                kind: DocumentKind::GameImage,
                file_name: format!("{}-image.{}", game_id.to_hex(), extension),
                content_type,
                bytes,
            })
            .await?;

        let updated = self.game_repo
            .update(&game_id, doc! { "image_document_id": document.id })
            .await?
            .ok_or_else(|| AppError::NotFound("게임을 찾을 수 없습니다".to_string()))?;

        if let Some(old_id) = game.image_document_id {
            if let Some(old) = self.document_service.find(&old_id).await? {
                self.document_service.remove(&old).await?;
            }
        }

        Ok(GameResponse::from(updated))
    }

    pub async fn get_image(&self, id: &str) -> Result<(Document, Vec<u8>), AppError> {
        let game_id = parse_object_id(id, "게임 ID")?;
        let game = self.find_game(&game_id).await?;

        let image_id = game.image_document_id
            .ok_or_else(|| AppError::NotFound("게임 이미지가 없습니다".to_string()))?;

        self.document_service.download_by_id(&image_id).await
    }

    pub async fn list_game_documents(&self, id: &str) -> Result<Vec<DocumentResponse>, AppError> {
        self.document_service.list_for_game(id).await
    }

    /// 게임의 대여 이력. 소유자 또는 관리자만 볼 수 있습니다.
    pub async fn list_game_loans(&self, caller: &AuthenticatedUser, id: &str) -> Result<Vec<LoanResponse>, AppError> {
        let game_id = parse_object_id(id, "게임 ID")?;
        let game = self.find_game(&game_id).await?;
        caller.ensure_can_act_for(&game.owner_id)?;

        let now = DateTime::now();
        let loans = self.loan_repo.find_by_game(&game_id).await?;
        Ok(loans.into_iter().map(|loan| LoanResponse::from_loan(loan, now)).collect())
    }
}

//! 게임 리포지토리
//!
//! 목록 조회 필터 구성과 대여 시 상태 전이(`AVAILABLE` → `BORROWED`)를
//! 조건부 갱신으로 처리합니다. 두 요청이 동시에 같은 게임을 빌리려 할 때
//! 한쪽만 성공합니다. 소유자의 수정/삭제도 `BORROWED`가 아닌 경우에만
//! 적용되도록 필터에 상태 조건을 함께 겁니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document, Regex},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    IndexModel,
};
use singleton_macro::repository;
use crate::{
    core::registry::Repository,
    db::Database,
    domain::dto::games::GameListQuery,
    domain::dto::common::PageQuery,
    domain::entities::games::{Game, GameStatus},
    errors::AppError,
    utils::string_utils::{escape_regex, parse_object_id},
};

#[repository(name = "game", collection = "games")]
pub struct GameRepository {
    db: Arc<Database>,
}

/// `_id`가 일치하고 대여 중이 아닌 게임만 매칭합니다.
pub fn unborrowed_game_filter(id: &ObjectId) -> Document {
    doc! { "_id": id, "status": { "$ne": GameStatus::Borrowed.as_str() } }
}

/// 목록 조회 쿼리를 MongoDB 필터로 변환합니다.
///
/// `q`는 제목에 대한 대소문자 무시 부분 일치입니다.
pub fn build_game_filter(query: &GameListQuery) -> Result<Document, AppError> {
    let mut filter = Document::new();

    if let Some(status) = query.status {
        filter.insert("status", status.as_str());
    }

    if let Some(platform) = query.platform.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        filter.insert("platform", platform);
    }

    if let Some(owner_id) = query.owner_id.as_deref() {
        filter.insert("owner_id", parse_object_id(owner_id, "소유자 ID")?);
    }

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        filter.insert("title", Regex {
            pattern: escape_regex(q),
            options: "i".to_string(),
        });
    }

    Ok(filter)
}

impl GameRepository {
    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Game>, AppError> {
        let game = self.collection::<Game>()
            .find_one(doc! { "_id": id })
            .await?;
        Ok(game)
    }

    pub async fn find_page(&self, filter: Document, page: &PageQuery) -> Result<Vec<Game>, AppError> {
        let cursor = self.collection::<Game>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(page.skip())
            .limit(page.size() as i64)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Game>().count_documents(filter).await?)
    }

    pub async fn find_by_owner(&self, owner_id: &ObjectId) -> Result<Vec<Game>, AppError> {
        let cursor = self.collection::<Game>()
            .find(doc! { "owner_id": owner_id })
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn create(&self, mut game: Game) -> Result<Game, AppError> {
        let result = self.collection::<Game>().insert_one(&game).await?;

        game.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 게임 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(game)
    }

    /// `$set` 문서로 부분 갱신합니다. `updated_at`은 자동으로 설정됩니다.
    pub async fn update(&self, id: &ObjectId, update_doc: Document) -> Result<Option<Game>, AppError> {
        self.update_matching(doc! { "_id": id }, update_doc).await
    }

    /// 대여 중이 아닐 때만 갱신합니다. 그 사이 대여가 시작됐다면 `None`입니다.
    pub async fn update_unless_borrowed(&self, id: &ObjectId, update_doc: Document) -> Result<Option<Game>, AppError> {
        self.update_matching(unborrowed_game_filter(id), update_doc).await
    }

    async fn update_matching(&self, filter: Document, mut update_doc: Document) -> Result<Option<Game>, AppError> {
        update_doc.insert("updated_at", mongodb::bson::DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let game = self.collection::<Game>()
            .find_one_and_update(filter, doc! { "$set": update_doc })
            .with_options(options)
            .await?;

        Ok(game)
    }

    /// `AVAILABLE`인 경우에만 `BORROWED`로 바꿉니다.
    ///
    /// 이미 다른 요청이 상태를 바꿨다면 `None`을 반환합니다.
    pub async fn try_mark_borrowed(&self, id: &ObjectId) -> Result<Option<Game>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let game = self.collection::<Game>()
            .find_one_and_update(
                doc! { "_id": id, "status": GameStatus::Available.as_str() },
                doc! { "$set": {
                    "status": GameStatus::Borrowed.as_str(),
                    "updated_at": mongodb::bson::DateTime::now(),
                } },
            )
            .with_options(options)
            .await?;

        Ok(game)
    }

    pub async fn set_status(&self, id: &ObjectId, status: GameStatus) -> Result<Option<Game>, AppError> {
        self.update(id, doc! { "status": status.as_str() }).await
    }

    /// 대여 중이 아닐 때만 삭제합니다. 삭제했으면 `true`입니다.
    pub async fn delete_unless_borrowed(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Game>()
            .delete_one(unborrowed_game_filter(id))
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("owner_created_at".to_string()).build())
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "platform": 1 })
            .options(IndexOptions::builder().name("status_platform".to_string()).build())
            .build();

        self.collection::<Game>()
            .create_indexes([owner_index, status_index])
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_builds_empty_filter() {
        let filter = build_game_filter(&GameListQuery::default()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_combines_all_conditions() {
        let owner = ObjectId::new();
        let query = GameListQuery {
            status: Some(GameStatus::Available),
            platform: Some(" Switch ".to_string()),
            owner_id: Some(owner.to_hex()),
            q: Some("mario (deluxe)".to_string()),
            ..Default::default()
        };

        let filter = build_game_filter(&query).unwrap();

        assert_eq!(filter.get_str("status").unwrap(), "AVAILABLE");
        assert_eq!(filter.get_str("platform").unwrap(), "Switch");
        assert_eq!(filter.get_object_id("owner_id").unwrap(), owner);

        match filter.get("title") {
            Some(mongodb::bson::Bson::RegularExpression(regex)) => {
                assert_eq!(regex.pattern, "mario \\(deluxe\\)");
                assert_eq!(regex.options, "i");
            }
            other => panic!("unexpected title filter: {:?}", other),
        }
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = GameListQuery {
            q: Some("   ".to_string()),
            platform: Some("".to_string()),
            ..Default::default()
        };
        assert!(build_game_filter(&query).unwrap().is_empty());
    }

    #[test]
    fn test_unborrowed_filter_excludes_borrowed_status() {
        let id = ObjectId::new();
        let filter = unborrowed_game_filter(&id);

        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        let status = filter.get_document("status").unwrap();
        assert_eq!(status.get_str("$ne").unwrap(), "BORROWED");
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_invalid_owner_id_is_rejected() {
        let query = GameListQuery {
            owner_id: Some("xyz".to_string()),
            ..Default::default()
        };
        assert!(matches!(build_game_filter(&query), Err(AppError::ValidationError(_))));
    }
}

//! 문서 메타데이터 리포지토리
//!
//! 파일 바이트는 `FileStorage`에, 메타데이터는 `documents` 컬렉션에 저장됩니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document as BsonDocument},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;
use crate::{
    core::registry::Repository,
    db::Database,
    domain::entities::documents::Document,
    errors::AppError,
};

#[repository(name = "document", collection = "documents")]
pub struct DocumentRepository {
    db: Arc<Database>,
}

impl DocumentRepository {
    pub async fn create(&self, mut document: Document) -> Result<Document, AppError> {
        let result = self.collection::<Document>().insert_one(&document).await?;

        document.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 문서 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(document)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.collection::<Document>().find_one(doc! { "_id": id }).await?)
    }

    async fn find_many(&self, filter: BsonDocument) -> Result<Vec<Document>, AppError> {
        let cursor = self.collection::<Document>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_game(&self, game_id: &ObjectId) -> Result<Vec<Document>, AppError> {
        self.find_many(doc! { "game_id": game_id }).await
    }

    pub async fn find_by_owner(&self, owner_id: &ObjectId) -> Result<Vec<Document>, AppError> {
        self.find_many(doc! { "owner_id": owner_id }).await
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Document>().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let game_index = IndexModel::builder()
            .keys(doc! { "game_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("game_created_at".to_string()).build())
            .build();

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1 })
            .options(IndexOptions::builder().name("owner_id".to_string()).build())
            .build();

        self.collection::<Document>()
            .create_indexes([game_index, owner_index])
            .await?;

        Ok(())
    }
}

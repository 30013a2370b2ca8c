//! 사용자 리포지토리
//!
//! `users` 컬렉션에 대한 CRUD와 Redis 캐시(ID/이메일 기준, 10분)를 담당합니다.
//! 이메일/사용자명 중복은 고유 인덱스와 사전 조회 양쪽에서 막습니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, Document}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
    domain::dto::common::PageQuery,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

const USER_CACHE_TTL_SECONDS: u64 = 600;

#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

fn email_cache_key(email: &str) -> String {
    format!("user:email:{}", email)
}

impl UserRepository {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let cache_key = email_cache_key(email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, USER_CACHE_TTL_SECONDS)
                .await;
        }

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let cache_key = self.cache_key(&id.to_hex());

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.collection::<User>()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, USER_CACHE_TTL_SECONDS)
                .await;
        }

        Ok(user)
    }

    /// 가입일 역순으로 한 페이지를 조회합니다.
    pub async fn find_page(&self, page: &PageQuery) -> Result<Vec<User>, AppError> {
        let cursor = self.collection::<User>()
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(page.skip())
            .limit(page.size() as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<User>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        let result = self.collection::<User>()
            .insert_one(&user)
            .await
            .map_err(map_duplicate_key)?;

        user.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 사용자 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(user)
    }

    /// `$set` 문서로 부분 갱신하고 갱신된 사용자를 반환합니다.
    ///
    /// `updated_at`은 항상 함께 갱신됩니다.
    pub async fn update(&self, id: &ObjectId, mut update_doc: Document) -> Result<Option<User>, AppError> {
        update_doc.insert("updated_at", mongodb::bson::DateTime::now());

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let before = self.find_by_id(id).await?;

        let updated_user = self.collection::<User>()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(map_duplicate_key)?;

        if updated_user.is_some() {
            self.evict(id, before.as_ref().map(|u| u.email.as_str())).await;
        }

        Ok(updated_user)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let before = self.find_by_id(id).await?;

        let result = self.collection::<User>()
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            self.evict(id, before.as_ref().map(|u| u.email.as_str())).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn evict(&self, id: &ObjectId, email: Option<&str>) {
        let _ = self.invalidate_cache(&id.to_hex()).await;
        if let Some(email) = email {
            let _ = self.redis.del(&email_cache_key(email)).await;
        }
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, username_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

/// 고유 인덱스 위반(E11000)은 409로, 나머지는 500으로 변환합니다.
fn map_duplicate_key(e: mongodb::error::Error) -> AppError {
    if e.to_string().contains("E11000") {
        AppError::ConflictError("이미 사용 중인 이메일 또는 사용자명입니다".to_string())
    } else {
        AppError::DatabaseError(e.to_string())
    }
}

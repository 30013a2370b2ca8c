//! 대여 리포지토리

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;
use crate::{
    core::registry::Repository,
    db::Database,
    domain::entities::loans::{Loan, LoanStatus},
    errors::AppError,
};

#[repository(name = "loan", collection = "loans")]
pub struct LoanRepository {
    db: Arc<Database>,
}

impl LoanRepository {
    pub async fn create(&self, mut loan: Loan) -> Result<Loan, AppError> {
        let result = self.collection::<Loan>().insert_one(&loan).await?;

        loan.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 대여 ID를 확인할 수 없습니다".to_string())
        })?);

        Ok(loan)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Loan>, AppError> {
        Ok(self.collection::<Loan>().find_one(doc! { "_id": id }).await?)
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Loan>, AppError> {
        let cursor = self.collection::<Loan>()
            .find(filter)
            .sort(doc! { "start_date": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// 사용자가 빌린 대여 목록 (최근 순)
    pub async fn find_by_borrower(&self, borrower_id: &ObjectId) -> Result<Vec<Loan>, AppError> {
        self.find_many(doc! { "borrower_id": borrower_id }).await
    }

    /// 사용자가 빌려준 대여 목록 (최근 순)
    pub async fn find_by_lender(&self, lender_id: &ObjectId) -> Result<Vec<Loan>, AppError> {
        self.find_many(doc! { "lender_id": lender_id }).await
    }

    pub async fn find_by_game(&self, game_id: &ObjectId) -> Result<Vec<Loan>, AppError> {
        self.find_many(doc! { "game_id": game_id }).await
    }

    /// 사용자가 대여자 또는 대여인으로 참여 중인 진행 중 대여 수
    pub async fn count_active_for_user(&self, user_id: &ObjectId) -> Result<u64, AppError> {
        let filter = doc! {
            "status": LoanStatus::Active.as_str(),
            "$or": [
                { "borrower_id": user_id },
                { "lender_id": user_id },
            ],
        };

        Ok(self.collection::<Loan>().count_documents(filter).await?)
    }

    /// 반납 처리된 대여를 저장합니다.
    pub async fn save_return(&self, loan: &Loan) -> Result<bool, AppError> {
        let id = loan.id.ok_or_else(|| {
            AppError::InternalError("ID 없는 대여는 갱신할 수 없습니다".to_string())
        })?;

        let result = self.collection::<Loan>()
            .update_one(
                doc! { "_id": id, "status": LoanStatus::Active.as_str() },
                doc! { "$set": {
                    "status": loan.status.as_str(),
                    "return_date": loan.return_date,
                    "updated_at": loan.updated_at,
                } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Loan>().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_by_game(&self, game_id: &ObjectId) -> Result<u64, AppError> {
        let result = self.collection::<Loan>()
            .delete_many(doc! { "game_id": game_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let indexes = [
            ("borrower_id", "borrower_start_date"),
            ("lender_id", "lender_start_date"),
            ("game_id", "game_start_date"),
        ]
        .into_iter()
        .map(|(field, name)| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            keys.insert("start_date", -1);

            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        });

        self.collection::<Loan>().create_indexes(indexes).await?;
        Ok(())
    }
}

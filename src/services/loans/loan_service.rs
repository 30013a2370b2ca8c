//! 대여 서비스
//!
//! 대여 요청 시 게임 상태를 조건부 갱신(`AVAILABLE` → `BORROWED`)으로 선점하고,
//! 대여 기록 저장이 실패하면 상태를 되돌립니다.

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;
use crate::{
    config::LoanConfig,
    domain::dto::loans::{CreateLoanRequest, LoanResponse},
    domain::entities::games::GameStatus,
    domain::entities::loans::{resolve_due_date, validate_loan_request, Loan},
    domain::models::auth::AuthenticatedUser,
    errors::AppError,
    repositories::{games::GameRepository, loans::LoanRepository},
    utils::string_utils::parse_object_id,
};

/// 대여 당사자(대여자/대여인) 또는 관리자만 접근할 수 있습니다.
pub fn ensure_participant(caller: &AuthenticatedUser, loan: &Loan) -> Result<(), AppError> {
    if caller.is_admin() || loan.involves(&caller.object_id()?) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError("대여 당사자만 접근할 수 있습니다".to_string()))
    }
}

#[service(name = "loan")]
pub struct LoanService {
    loan_repo: Arc<LoanRepository>,
    game_repo: Arc<GameRepository>,
}

impl LoanService {
    pub async fn request_loan(&self, caller: &AuthenticatedUser, request: CreateLoanRequest) -> Result<LoanResponse, AppError> {
        let borrower_id = caller.object_id()?;
        let game_id = parse_object_id(&request.game_id, "게임 ID")?;

        let game = self.game_repo
            .find_by_id(&game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("게임을 찾을 수 없습니다".to_string()))?;

        let now = DateTime::now();
        let due_date = resolve_due_date(request.due_date_bson(), now, LoanConfig::default_loan_days());
        validate_loan_request(&game, &borrower_id, due_date, now, LoanConfig::max_loan_days())?;

        if self.game_repo.try_mark_borrowed(&game_id).await?.is_none() {
            return Err(AppError::ConflictError("이미 다른 사용자가 대여한 게임입니다".to_string()));
        }

        let loan = Loan::new(game_id, game.owner_id, borrower_id, due_date, request.notes);

        match self.loan_repo.create(loan).await {
            Ok(created) => {
                log::info!(
                    "📦 대여 시작 - loan: {}, game: {}, borrower: {}",
                    created.id_string().unwrap_or_default(),
                    game_id,
                    borrower_id
                );
                Ok(LoanResponse::from_loan(created, now))
            }
            Err(e) => {
                log::error!("대여 기록 저장 실패, 게임 상태 복구 - game: {}, error: {}", game_id, e);
                if let Err(rollback) = self.game_repo.set_status(&game_id, GameStatus::Available).await {
                    log::error!("게임 상태 복구 실패 - game: {}, error: {}", game_id, rollback);
                }
                Err(e)
            }
        }
    }

    async fn find_loan(&self, id: &str) -> Result<Loan, AppError> {
        let id = parse_object_id(id, "대여 ID")?;
        self.loan_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("대여 기록을 찾을 수 없습니다".to_string()))
    }

    pub async fn return_loan(&self, caller: &AuthenticatedUser, id: &str) -> Result<LoanResponse, AppError> {
        let mut loan = self.find_loan(id).await?;
        ensure_participant(caller, &loan)?;

        let now = DateTime::now();
        loan.mark_returned(now)?;

        if !self.loan_repo.save_return(&loan).await? {
            return Err(AppError::ConflictError("이미 반납된 대여입니다".to_string()));
        }

        self.game_repo.set_status(&loan.game_id, GameStatus::Available).await?;

        log::info!("✅ 반납 완료 - loan: {}, game: {}", id, loan.game_id);
        Ok(LoanResponse::from_loan(loan, now))
    }

    pub async fn get_loan(&self, caller: &AuthenticatedUser, id: &str) -> Result<LoanResponse, AppError> {
        let loan = self.find_loan(id).await?;
        ensure_participant(caller, &loan)?;
        Ok(LoanResponse::from_loan(loan, DateTime::now()))
    }

    /// 호출자가 빌린 대여 목록
    pub async fn list_borrowed(&self, caller: &AuthenticatedUser) -> Result<Vec<LoanResponse>, AppError> {
        let now = DateTime::now();
        let loans = self.loan_repo.find_by_borrower(&caller.object_id()?).await?;
        Ok(loans.into_iter().map(|loan| LoanResponse::from_loan(loan, now)).collect())
    }

    /// 호출자가 빌려준 대여 목록
    pub async fn list_lent(&self, caller: &AuthenticatedUser) -> Result<Vec<LoanResponse>, AppError> {
        let now = DateTime::now();
        let loans = self.loan_repo.find_by_lender(&caller.object_id()?).await?;
        Ok(loans.into_iter().map(|loan| LoanResponse::from_loan(loan, now)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn caller(id: ObjectId, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id.to_hex(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn loan(lender: ObjectId, borrower: ObjectId) -> Loan {
        let due = DateTime::from_millis(DateTime::now().timestamp_millis() + 86_400_000);
        Loan::new(ObjectId::new(), lender, borrower, due, None)
    }

    #[test]
    fn test_participants_can_access_loan() {
        let lender = ObjectId::new();
        let borrower = ObjectId::new();
        let loan = loan(lender, borrower);

        assert!(ensure_participant(&caller(lender, &["user"]), &loan).is_ok());
        assert!(ensure_participant(&caller(borrower, &["user"]), &loan).is_ok());
    }

    #[test]
    fn test_outsider_is_forbidden_unless_admin() {
        let loan = loan(ObjectId::new(), ObjectId::new());

        assert!(matches!(
            ensure_participant(&caller(ObjectId::new(), &["user"]), &loan),
            Err(AppError::AuthorizationError(_))
        ));
        assert!(ensure_participant(&caller(ObjectId::new(), &["user", "admin"]), &loan).is_ok());
    }
}

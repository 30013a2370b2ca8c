use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::domain::dto::common::to_rfc3339;
use crate::domain::entities::loans::{Loan, LoanStatus};

/// 대여 응답. `overdue`는 응답 시점 기준으로 계산됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: String,
    pub game_id: String,
    pub lender_id: String,
    pub borrower_id: String,
    pub start_date: String,
    pub due_date: String,
    pub return_date: Option<String>,
    pub status: LoanStatus,
    pub notes: Option<String>,
    pub overdue: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl LoanResponse {
    pub fn from_loan(loan: Loan, now: DateTime) -> Self {
        let overdue = loan.is_overdue(now);

        Self {
            id: loan.id.map(|id| id.to_hex()).unwrap_or_default(),
            game_id: loan.game_id.to_hex(),
            lender_id: loan.lender_id.to_hex(),
            borrower_id: loan.borrower_id.to_hex(),
            start_date: to_rfc3339(loan.start_date),
            due_date: to_rfc3339(loan.due_date),
            return_date: loan.return_date.map(to_rfc3339),
            status: loan.status,
            notes: loan.notes,
            overdue,
            created_at: to_rfc3339(loan.created_at),
            updated_at: to_rfc3339(loan.updated_at),
        }
    }
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self::from_loan(loan, DateTime::now())
    }
}

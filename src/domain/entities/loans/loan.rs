//! 대여 엔티티
//!
//! 게임 한 개를 소유자(lender)가 다른 사용자(borrower)에게 빌려준 기록입니다.
//! `ACTIVE` 대여는 게임당 최대 하나이며, 이 제약은 게임 상태의 조건부 갱신으로 보장됩니다.

use chrono::Duration;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::domain::entities::games::{Game, GameStatus};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Returned => "RETURNED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub game_id: ObjectId,
    pub lender_id: ObjectId,
    pub borrower_id: ObjectId,
    pub start_date: DateTime,
    pub due_date: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime>,
    pub status: LoanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Loan {
    pub fn new(
        game_id: ObjectId,
        lender_id: ObjectId,
        borrower_id: ObjectId,
        due_date: DateTime,
        notes: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            game_id,
            lender_id,
            borrower_id,
            start_date: now,
            due_date,
            return_date: None,
            status: LoanStatus::Active,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// 대여자 또는 대여인인지 확인합니다.
    pub fn involves(&self, user_id: &ObjectId) -> bool {
        &self.lender_id == user_id || &self.borrower_id == user_id
    }

    /// 진행 중이면서 반납 기한이 지난 경우 연체입니다.
    pub fn is_overdue(&self, now: DateTime) -> bool {
        self.is_active() && self.due_date < now
    }

    /// 반납 처리합니다. 이미 반납된 대여는 409를 반환합니다.
    pub fn mark_returned(&mut self, now: DateTime) -> Result<(), AppError> {
        if !self.is_active() {
            return Err(AppError::ConflictError("이미 반납된 대여입니다".to_string()));
        }

        self.status = LoanStatus::Returned;
        self.return_date = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// 요청된 반납 기한을 결정합니다. 지정하지 않으면 `now + default_days`입니다.
pub fn resolve_due_date(requested: Option<DateTime>, now: DateTime, default_days: i64) -> DateTime {
    requested.unwrap_or_else(|| add_days(now, default_days))
}

/// 대여 요청이 비즈니스 규칙을 만족하는지 검사합니다.
///
/// * 게임이 `AVAILABLE`이어야 함 (409)
/// * 자신의 게임은 빌릴 수 없음 (400)
/// * 반납 기한은 미래이고 `max_days` 이내여야 함 (400)
pub fn validate_loan_request(
    game: &Game,
    borrower_id: &ObjectId,
    due_date: DateTime,
    now: DateTime,
    max_days: i64,
) -> Result<(), AppError> {
    if game.is_owned_by(borrower_id) {
        return Err(AppError::ValidationError("자신의 게임은 빌릴 수 없습니다".to_string()));
    }

    if game.status != GameStatus::Available {
        return Err(AppError::ConflictError(format!(
            "현재 대여할 수 없는 게임입니다 (상태: {})",
            game.status.as_str()
        )));
    }

    if due_date <= now {
        return Err(AppError::ValidationError("반납 기한은 현재 시각 이후여야 합니다".to_string()));
    }

    if due_date > add_days(now, max_days) {
        return Err(AppError::ValidationError(format!(
            "반납 기한은 최대 {}일 이내여야 합니다",
            max_days
        )));
    }

    Ok(())
}

fn add_days(at: DateTime, days: i64) -> DateTime {
    DateTime::from_millis(at.timestamp_millis() + Duration::days(days).num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available_game(owner: ObjectId) -> Game {
        Game::new(owner, "Hades".to_string(), "PC".to_string(), None, None)
    }

    fn days_from(now: DateTime, days: i64) -> DateTime {
        add_days(now, days)
    }

    #[test]
    fn test_default_due_date() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let due = resolve_due_date(None, now, 14);
        assert_eq!(due.timestamp_millis() - now.timestamp_millis(), 14 * 24 * 60 * 60 * 1000);

        let explicit = days_from(now, 3);
        assert_eq!(resolve_due_date(Some(explicit), now, 14), explicit);
    }

    #[test]
    fn test_valid_loan_request() {
        let now = DateTime::now();
        let game = available_game(ObjectId::new());

        assert!(validate_loan_request(&game, &ObjectId::new(), days_from(now, 7), now, 90).is_ok());
    }

    #[test]
    fn test_owner_cannot_borrow_own_game() {
        let now = DateTime::now();
        let owner = ObjectId::new();
        let game = available_game(owner);

        assert!(matches!(
            validate_loan_request(&game, &owner, days_from(now, 7), now, 90),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unavailable_game_is_conflict() {
        let now = DateTime::now();
        let mut game = available_game(ObjectId::new());

        for status in [GameStatus::Borrowed, GameStatus::Unavailable] {
            game.status = status;
            assert!(matches!(
                validate_loan_request(&game, &ObjectId::new(), days_from(now, 7), now, 90),
                Err(AppError::ConflictError(_))
            ));
        }
    }

    #[test]
    fn test_due_date_bounds() {
        let now = DateTime::now();
        let game = available_game(ObjectId::new());
        let borrower = ObjectId::new();

        assert!(validate_loan_request(&game, &borrower, now, now, 90).is_err());
        assert!(validate_loan_request(&game, &borrower, days_from(now, -1), now, 90).is_err());
        assert!(validate_loan_request(&game, &borrower, days_from(now, 91), now, 90).is_err());
        assert!(validate_loan_request(&game, &borrower, days_from(now, 90), now, 90).is_ok());
    }

    #[test]
    fn test_overdue_only_while_active() {
        let now = DateTime::now();
        let mut loan = Loan::new(
            ObjectId::new(),
            ObjectId::new(),
            ObjectId::new(),
            days_from(now, -2),
            None,
        );

        assert!(loan.is_overdue(now));

        loan.mark_returned(now).unwrap();
        assert!(!loan.is_overdue(now));
        assert_eq!(loan.return_date, Some(now));
    }

    #[test]
    fn test_return_twice_is_conflict() {
        let now = DateTime::now();
        let mut loan = Loan::new(ObjectId::new(), ObjectId::new(), ObjectId::new(), days_from(now, 5), None);

        assert!(loan.mark_returned(now).is_ok());
        assert!(matches!(loan.mark_returned(now), Err(AppError::ConflictError(_))));
        assert_eq!(loan.status, LoanStatus::Returned);
    }

    #[test]
    fn test_involves_participants_only() {
        let lender = ObjectId::new();
        let borrower = ObjectId::new();
        let loan = Loan::new(ObjectId::new(), lender, borrower, DateTime::now(), None);

        assert!(loan.involves(&lender));
        assert!(loan.involves(&borrower));
        assert!(!loan.involves(&ObjectId::new()));
    }
}

//! 여러 리소스에서 공유하는 DTO
//!
//! 페이지네이션 쿼리/응답과 BSON 시각 → RFC 3339 문자열 변환을 제공합니다.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&size=` 쿼리
///
/// 페이지는 1부터 시작합니다. 범위를 벗어난 값은 오류 대신 가장 가까운 유효값으로 보정합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// MongoDB `skip` 값
    pub fn skip(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.size())
    }
}

/// 페이지 단위 목록 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total: u64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total: u64) -> Self {
        Self {
            items,
            page: query.page(),
            size: query.size(),
            total,
        }
    }
}

/// BSON 시각을 RFC 3339 문자열로 변환합니다.
pub fn to_rfc3339(value: DateTime) -> String {
    value
        .try_to_rfc3339_string()
        .unwrap_or_else(|_| value.timestamp_millis().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn test_page_query_clamps() {
        let query = PageQuery { page: Some(0), size: Some(1_000) };
        assert_eq!(query.page(), 1);
        assert_eq!(query.size(), MAX_PAGE_SIZE);

        let query = PageQuery { page: Some(3), size: Some(10) };
        assert_eq!(query.skip(), 20);
    }

    #[test]
    fn test_to_rfc3339() {
        let formatted = to_rfc3339(DateTime::from_millis(0));
        assert!(formatted.starts_with("1970-01-01T00:00:00"));
    }
}

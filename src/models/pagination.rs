use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    OrderResponse, ProductResponse, SubscriptionResponse, TariffResponse, UserResponse,
};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
/// Offsets are bound as signed 64-bit integers by the database driver.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// `?search=&offset=&limit=` accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring filter
    pub search: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn new(search: Option<&str>, offset: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            search: search.map(str::to_string),
            offset,
            limit,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0).min(MAX_OFFSET)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Trimmed search term, `None` when blank.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PaginationOut {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

/// `data` of every list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserPage = ListPayload<UserResponse>,
    TariffPage = ListPayload<TariffResponse>,
    SubscriptionPage = ListPayload<SubscriptionResponse>,
    ProductPage = ListPayload<ProductResponse>,
    OrderPage = ListPayload<OrderResponse>
)]
pub struct ListPayload<T> {
    pub items: Vec<T>,
    pub pagination: PaginationOut,
}

impl<T> ListPayload<T> {
    pub fn new(items: Vec<T>, query: &ListQuery, total: u64) -> Self {
        Self {
            items,
            pagination: PaginationOut {
                offset: query.offset(),
                limit: query.limit(),
                total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_capped_to_signed_range() {
        let query = ListQuery::new(None, Some(u64::MAX), None);
        assert_eq!(query.offset(), i64::MAX as u64);

        let query = ListQuery::new(None, Some(i64::MAX as u64 + 1), None);
        assert_eq!(query.offset(), i64::MAX as u64);
    }

    #[test]
    fn test_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 20);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(ListQuery::new(None, None, Some(0)).limit(), 1);
        assert_eq!(ListQuery::new(None, None, Some(500)).limit(), 100);
        assert_eq!(ListQuery::new(None, Some(40), Some(10)).offset(), 40);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(ListQuery::new(Some("   "), None, None).search(), None);
        assert_eq!(ListQuery::new(Some(" pro "), None, None).search(), Some("pro"));
    }

    #[test]
    fn test_payload_echoes_effective_window() {
        let query = ListQuery::new(None, Some(5), Some(1000));
        let payload = ListPayload::new(vec![1, 2], &query, 42);
        assert_eq!(
            payload.pagination,
            PaginationOut {
                offset: 5,
                limit: 100,
                total: 42
            }
        );
    }
}

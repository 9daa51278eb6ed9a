//! List filtering and pagination.

use serde::{Deserialize, Serialize};
use todo_core::types::Timestamp;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u8 = 20;
pub const MAX_LIMIT: u8 = 250;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Asc,
    Desc,
}

impl SortBy {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortBy::Asc => "ASC",
            SortBy::Desc => "DESC",
        }
    }
}

/// Parameters narrowing a list query.
///
/// Passing `None` where an `Option<&QueryFilter>` is accepted behaves exactly
/// like passing `QueryFilter::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilter {
    pub page: u64,
    pub limit: u8,
    pub sort_by: SortBy,
    pub include_archived: bool,
    pub created_after: Option<Timestamp>,
    pub created_before: Option<Timestamp>,
    pub updated_after: Option<Timestamp>,
    pub updated_before: Option<Timestamp>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortBy::Asc,
            include_archived: false,
            created_after: None,
            created_before: None,
            updated_after: None,
            updated_before: None,
        }
    }
}

impl QueryFilter {
    /// Resolve an optional filter to the one actually applied. Page is at
    /// least 1 and limit falls in `1..=MAX_LIMIT`; page has no upper bound,
    /// so [`QueryFilter::offset`] saturates.
    pub fn effective(filter: Option<&QueryFilter>) -> QueryFilter {
        let mut f = filter.cloned().unwrap_or_default();
        f.page = f.page.max(1);
        f.limit = if f.limit == 0 {
            DEFAULT_LIMIT
        } else {
            f.limit.min(MAX_LIMIT)
        };
        f
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(u64::from(self.limit))
    }
}

/// Pagination metadata attached to every list result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u8,
    pub filtered_count: u64,
    pub total_count: u64,
}

/// A page of entities plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_filter_resolves_to_default() {
        assert_eq!(QueryFilter::effective(None), QueryFilter::default());
    }

    #[test]
    fn default_filter_matches_documented_values() {
        let f = QueryFilter::default();
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, 20);
        assert_eq!(f.sort_by, SortBy::Asc);
        assert!(!f.include_archived);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let f = QueryFilter::effective(Some(&QueryFilter {
            page: 0,
            limit: 255,
            ..Default::default()
        }));
        assert_eq!(f.page, 1);
        assert_eq!(f.limit, MAX_LIMIT);

        let f = QueryFilter::effective(Some(&QueryFilter {
            limit: 0,
            ..Default::default()
        }));
        assert_eq!(f.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn offset_is_zero_based() {
        let f = QueryFilter {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(f.offset(), 20);
    }

    #[test]
    fn offset_saturates_for_huge_pages() {
        let f = QueryFilter::effective(Some(&QueryFilter {
            page: u64::MAX,
            limit: MAX_LIMIT,
            ..Default::default()
        }));
        assert_eq!(f.page, u64::MAX);
        assert_eq!(f.offset(), u64::MAX);
    }
}

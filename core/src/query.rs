//! Listing queries and pagination.

use serde::{Deserialize, Serialize};

/// Filter, sort and page parameters for the resource listing.
///
/// Construct with [`ResourceQuery::new`] so page and limit are normalised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceQuery {
    page: u32,
    limit: u32,
    search: Option<String>,
    category: Option<String>,
    active_only: bool,
}

impl ResourceQuery {
    /// Page used when none (or zero) is requested.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when none (or zero) is requested.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Build a query. Blank search text and the `"all"` category (any case)
    /// mean "no filter".
    #[must_use]
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
        category: Option<String>,
        active_only: Option<bool>,
    ) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));

        Self {
            page: page.filter(|p| *p > 0).unwrap_or(Self::DEFAULT_PAGE),
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(Self::DEFAULT_LIMIT)
                .min(Self::MAX_LIMIT),
            search,
            category,
            active_only: active_only.unwrap_or(true),
        }
    }

    /// 1-based page number
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Case-insensitive substring matched against name and bio
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Exact category filter
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether inactive resources are excluded
    #[must_use]
    pub const fn active_only(&self) -> bool {
        self.active_only
    }

    /// Whether a resource with these fields passes the filters.
    ///
    /// Used by stores that filter in memory.
    #[must_use]
    pub fn matches(&self, name: &str, bio: &str, category: &str, is_active: bool) -> bool {
        if self.active_only && !is_active {
            return false;
        }
        if let Some(wanted) = self.category() {
            if category != wanted {
                return false;
            }
        }
        if let Some(needle) = self.search() {
            let needle = needle.to_lowercase();
            return name.to_lowercase().contains(&needle) || bio.to_lowercase().contains(&needle);
        }
        true
    }
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

/// Pagination metadata returned with every listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based)
    pub current: u32,
    /// Total number of pages, `ceil(total / limit)`
    pub pages: u64,
    /// Total number of matching items
    pub total: u64,
}

/// One page of results.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Assemble a page from its items and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, query: &ResourceQuery, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination {
                current: query.page(),
                pages: total.div_ceil(u64::from(query.limit())),
                total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_or_zero_values() {
        let query = ResourceQuery::new(Some(0), Some(0), None, None, None);
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 10);
        assert!(query.active_only());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let query = ResourceQuery::new(Some(3), Some(1_000), None, None, None);
        assert_eq!(query.limit(), ResourceQuery::MAX_LIMIT);
        assert_eq!(query.offset(), 200);
    }

    #[test]
    fn all_category_and_blank_search_mean_no_filter() {
        let query = ResourceQuery::new(
            None,
            None,
            Some("   ".to_string()),
            Some("All".to_string()),
            None,
        );
        assert_eq!(query.search(), None);
        assert_eq!(query.category(), None);
    }

    #[test]
    fn matches_searches_name_and_bio_case_insensitively() {
        let query = ResourceQuery::new(None, None, Some("CLOUD".to_string()), None, None);
        assert!(query.matches("John Smith", "cloud architecture", "Technology", true));
        assert!(query.matches("Cloudy Day Cafe", "coffee", "Food", true));
        assert!(!query.matches("Emily Chen", "financial planning", "Finance", true));
    }

    #[test]
    fn matches_respects_category_and_activity() {
        let query = ResourceQuery::new(None, None, None, Some("Library".to_string()), None);
        assert!(query.matches("Central Library", "", "Library", true));
        assert!(!query.matches("Central Library", "", "Library", false));
        assert!(!query.matches("Code Wizards", "", "Technology", true));

        let everything = ResourceQuery::new(None, None, None, None, Some(false));
        assert!(everything.matches("Closed Room", "", "Library", false));
    }

    #[test]
    fn page_count_rounds_up() {
        let query = ResourceQuery::new(Some(1), Some(4), None, None, None);
        assert_eq!(Page::<()>::new(vec![], &query, 0).pagination.pages, 0);
        assert_eq!(Page::<()>::new(vec![], &query, 4).pagination.pages, 1);
        assert_eq!(Page::<()>::new(vec![], &query, 5).pagination.pages, 2);
    }
}

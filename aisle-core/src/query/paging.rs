//! Page slicing with count metadata
//!
//! Paging is lenient: page numbers below one are treated as one, page sizes
//! are clamped into `1..=max_page_size`, and a page past the end is simply
//! empty.

use serde::{Deserialize, Serialize};

/// Page size bounds applied to every list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl PagingLimits {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const MAX_PAGE_SIZE: usize = 20;

    pub fn new(default_page_size: usize, max_page_size: usize) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, Self::MAX_PAGE_SIZE)
    }
}

/// A requested page after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Build a request from raw query values. Missing values fall back to
    /// page 1 and the configured default size.
    pub fn from_raw(page_number: Option<i64>, page_size: Option<i64>, limits: PagingLimits) -> Self {
        let page_number = page_number.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(limits.default_page_size as i64)
            .clamp(1, limits.max_page_size as i64);

        Self {
            page_number: usize::try_from(page_number).unwrap_or(usize::MAX),
            page_size: usize::try_from(page_size).unwrap_or(1),
        }
    }
}

/// One page of an ordered sequence plus navigation facts
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    items: Vec<T>,
    total_count: usize,
    page_size: usize,
    current_page: usize,
    total_pages: usize,
}

impl<T> PagedList<T> {
    /// Slice `source` (already filtered and sorted) into page `page_number`.
    pub fn create(source: Vec<T>, page_number: usize, page_size: usize) -> Self {
        let current_page = page_number.max(1);
        let page_size = page_size.max(1);
        let total_count = source.len();
        let total_pages = total_count.div_ceil(page_size);
        let offset = (current_page - 1).saturating_mul(page_size);

        let items = source.into_iter().skip(offset).take(page_size).collect();

        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages,
        }
    }

    pub fn from_request(source: Vec<T>, request: PageRequest) -> Self {
        Self::create(source, request.page_number, request.page_size)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
        }
    }

    /// Map the page items, keeping the counts
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Counts carried out-of-band, e.g. in the `X-Pagination` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    #[serde(skip)]
    pub has_previous: bool,
    #[serde(skip)]
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_third_page_of_twenty_five() {
        let items: Vec<u32> = (1..=25).collect();
        let page = PagedList::create(items, 3, 10);
        assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.total_count(), 25);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_empty_source_has_zero_pages() {
        let page = PagedList::<u8>::create(Vec::new(), 1, 10);
        assert_eq!(page.total_pages(), 0);
        assert!(page.items().is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_page_zero_is_clamped_to_first() {
        let page = PagedList::create(vec![1, 2, 3], 0, 2);
        assert_eq!(page.current_page(), 1);
        assert_eq!(page.items(), &[1, 2]);
    }

    #[test]
    fn test_page_request_clamps() {
        let limits = PagingLimits::default();
        assert_eq!(
            PageRequest::from_raw(None, None, limits),
            PageRequest { page_number: 1, page_size: 10 }
        );
        assert_eq!(
            PageRequest::from_raw(Some(-4), Some(500), limits),
            PageRequest { page_number: 1, page_size: 20 }
        );
        assert_eq!(PageRequest::from_raw(Some(2), Some(0), limits).page_size, 1);
    }

    #[test]
    fn test_limits_keep_default_within_max() {
        let limits = PagingLimits::new(50, 20);
        assert_eq!(limits.default_page_size, 20);
        let limits = PagingLimits::new(0, 0);
        assert_eq!(limits.max_page_size, 1);
        assert_eq!(limits.default_page_size, 1);
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let page = PagedList::create(vec![(); 11], 2, 5);
        let json = serde_json::to_value(page.metadata()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalCount": 11,
                "pageSize": 5,
                "currentPage": 2,
                "totalPages": 3
            })
        );
    }

    #[test]
    fn test_map_keeps_counts() {
        let page = PagedList::create(vec![1, 2, 3], 2, 2).map(|n| n * 10);
        assert_eq!(page.items(), &[30]);
        assert_eq!(page.total_count(), 3);
    }

    proptest! {
        #[test]
        fn prop_pages_cover_sequence(n in 0usize..200, p in 1usize..30) {
            let source: Vec<usize> = (0..n).collect();
            let first = PagedList::create(source.clone(), 1, p);
            prop_assert_eq!(first.total_pages(), n.div_ceil(p));

            let mut seen = Vec::new();
            for page_number in 1..=first.total_pages() {
                let page = PagedList::create(source.clone(), page_number, p);
                seen.extend_from_slice(page.items());
            }
            prop_assert_eq!(seen, source);
        }

        #[test]
        fn prop_past_last_page_is_empty(n in 0usize..100, p in 1usize..20, extra in 1usize..5) {
            let source: Vec<usize> = (0..n).collect();
            let total_pages = n.div_ceil(p);
            let page = PagedList::create(source, total_pages + extra, p);
            prop_assert!(page.items().is_empty());
            prop_assert!(!page.has_next());
        }
    }
}

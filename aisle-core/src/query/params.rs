use serde::{Deserialize, Serialize};

use super::paging::{PageRequest, PagingLimits};

/// Query string inputs of a list request
///
/// Everything is optional; defaults and clamping happen in
/// [`ResourceParameters::page_request`] so the raw values can still be echoed
/// back into navigation links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceParameters {
    #[serde(default, alias = "PageNumber", alias = "pagenumber")]
    pub page_number: Option<i64>,
    #[serde(default, alias = "PageSize", alias = "pagesize")]
    pub page_size: Option<i64>,
    #[serde(default, alias = "OrderBy", alias = "orderby")]
    pub order_by: Option<String>,
    #[serde(default, alias = "Fields")]
    pub fields: Option<String>,
    #[serde(default, alias = "SearchQuery", alias = "searchquery")]
    pub search_query: Option<String>,
}

impl ResourceParameters {
    pub fn page_request(&self, limits: PagingLimits) -> PageRequest {
        PageRequest::from_raw(self.page_number, self.page_size, limits)
    }

    /// The sort expression to apply, falling back to `default_order_by`
    pub fn order_by_or<'a>(&'a self, default_order_by: &'a str) -> &'a str {
        match self.order_by.as_deref() {
            Some(order_by) if !order_by.trim().is_empty() => order_by,
            _ => default_order_by,
        }
    }

    /// Trimmed, lowercased search text, if any
    pub fn search_needle(&self) -> Option<String> {
        self.search_query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_fallbacks() {
        let params = ResourceParameters::default();
        assert_eq!(params.order_by_or("Id"), "Id");
        assert_eq!(params.search_needle(), None);
        assert_eq!(
            params.page_request(PagingLimits::default()),
            PageRequest {
                page_number: 1,
                page_size: 10
            }
        );
    }

    #[test]
    fn test_blank_order_by_uses_default() {
        let params = ResourceParameters {
            order_by: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(params.order_by_or("ProductId"), "ProductId");
    }

    #[test]
    fn test_search_needle_is_trimmed_and_lowercased() {
        let params = ResourceParameters {
            search_query: Some("  Oslo ".into()),
            ..Default::default()
        };
        assert_eq!(params.search_needle().as_deref(), Some("oslo"));
    }

    #[test]
    fn test_deserializes_camel_case() {
        let params: ResourceParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": 2,
            "PageSize": 5,
            "orderBy": "name desc",
            "searchQuery": "milk"
        }))
        .unwrap();
        assert_eq!(params.page_number, Some(2));
        assert_eq!(params.page_size, Some(5));
        assert_eq!(params.order_by.as_deref(), Some("name desc"));
        assert_eq!(params.fields, None);
    }
}

//! Hypermedia links and pagination headers
//!
//! Clients opt into linked responses with
//! `Accept: application/vnd.idp.hateoas+json`. Plain responses carry the
//! previous/next page links in the `X-Pagination` header instead.

use aisle_core::query::{PageRequest, PaginationMetadata, ResourceParameters};
use axum::http::{HeaderMap, HeaderValue, header::ACCEPT};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::errors::AppError;
use crate::resources::RestResource;

pub const HATEOAS_MEDIA_TYPE: &str = "application/vnd.idp.hateoas+json";
pub const API_PREFIX: &str = "/api";
pub const X_PAGINATION: &str = "x-pagination";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDto {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl LinkDto {
    pub fn new(
        href: impl Into<String>,
        rel: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// Whether the `Accept` header asks for the linked representation
pub fn wants_hateoas(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|part| part.split(';').next())
        .any(|essence| essence.trim().eq_ignore_ascii_case(HATEOAS_MEDIA_TYPE))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Current,
    Previous,
    Next,
}

/// Builds absolute (or root-relative) hrefs for API routes
#[derive(Debug, Clone, Default)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    /// `public_url` is prepended to every href; without it hrefs start at
    /// `/api`.
    pub fn new(public_url: Option<&str>) -> Self {
        Self {
            base: public_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Href for a path below the API prefix, e.g. `/products/3`
    pub fn href(&self, path: &str) -> String {
        format!("{}{}{}", self.base, API_PREFIX, path)
    }

    /// Href for one page of the collection at `path`, echoing the request's
    /// query parameters.
    pub fn page_href(
        &self,
        path: &str,
        params: &ResourceParameters,
        request: PageRequest,
        target: PageTarget,
    ) -> String {
        let page_number = match target {
            PageTarget::Current => request.page_number,
            PageTarget::Previous => request.page_number.saturating_sub(1).max(1),
            PageTarget::Next => request.page_number.saturating_add(1),
        };

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [
            ("fields", params.fields.as_deref()),
            ("orderBy", params.order_by.as_deref()),
            ("searchQuery", params.search_query.as_deref()),
        ] {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                query.append_pair(key, value);
            }
        }
        query.append_pair("pageNumber", &page_number.to_string());
        query.append_pair("pageSize", &request.page_size.to_string());

        format!("{}?{}", self.href(path), query.finish())
    }

    /// `self`, `nextPage` and `previousPage` links of a collection
    pub fn collection_links(
        &self,
        path: &str,
        params: &ResourceParameters,
        request: PageRequest,
        metadata: &PaginationMetadata,
    ) -> Vec<LinkDto> {
        let mut links = vec![LinkDto::new(
            self.page_href(path, params, request, PageTarget::Current),
            "self",
            "GET",
        )];

        if metadata.has_next {
            links.push(LinkDto::new(
                self.page_href(path, params, request, PageTarget::Next),
                "nextPage",
                "GET",
            ));
        }

        if metadata.has_previous {
            links.push(LinkDto::new(
                self.page_href(path, params, request, PageTarget::Previous),
                "previousPage",
                "GET",
            ));
        }

        links
    }

    /// `self`, `delete_*`, `update_*` and `patch_*` links of one record
    pub fn item_links<R: RestResource>(
        &self,
        id: i64,
        fields: Option<&str>,
    ) -> Vec<LinkDto> {
        let item_path = format!("/{}/{}", R::ROUTE, id);
        let self_href = match fields.filter(|f| !f.trim().is_empty()) {
            Some(fields) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("fields", fields)
                    .finish();
                format!("{}?{}", self.href(&item_path), query)
            }
            None => self.href(&item_path),
        };

        let mut links = vec![
            LinkDto::new(self_href, "self", "GET"),
            LinkDto::new(
                self.href(&item_path),
                format!("delete_{}", R::LINK_NAME),
                "DELETE",
            ),
        ];
        links.extend(R::related_links(self, id));
        links.push(LinkDto::new(
            self.href(&item_path),
            format!("update_{}", R::LINK_NAME),
            "PUT",
        ));
        links.push(LinkDto::new(
            self.href(&item_path),
            format!("patch_{}", R::LINK_NAME),
            "PATCH",
        ));
        links
    }

    pub fn root_links(&self) -> Vec<LinkDto> {
        vec![
            LinkDto::new(self.href(""), "self", "GET"),
            LinkDto::new(self.href("/supermarkets"), "supermarkets", "GET"),
            LinkDto::new(
                self.href("/supermarkets"),
                "create_supermarket",
                "POST",
            ),
            LinkDto::new(self.href("/products"), "products", "GET"),
            LinkDto::new(self.href("/staffmembers"), "staffmembers", "GET"),
            LinkDto::new(self.href("/stock"), "stock", "GET"),
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlainPagination<'a> {
    previous_page_link: Option<&'a str>,
    next_page_link: Option<&'a str>,
    #[serde(flatten)]
    counts: &'a PaginationMetadata,
}

/// The `X-Pagination` header value. Page links are only included for plain
/// responses; linked responses carry them in the body.
pub fn pagination_header(
    metadata: &PaginationMetadata,
    page_links: Option<(Option<&str>, Option<&str>)>,
) -> Result<HeaderValue, AppError> {
    let encoded = match page_links {
        Some((previous_page_link, next_page_link)) => {
            serde_json::to_string(&PlainPagination {
                previous_page_link,
                next_page_link,
                counts: metadata,
            })
        }
        None => serde_json::to_string(metadata),
    }
    .map_err(|err| AppError::internal(format!("pagination header: {err}")))?;

    HeaderValue::from_str(&encoded)
        .map_err(|err| AppError::internal(format!("pagination header: {err}")))
}

//! The list pipeline shared by every collection endpoint
//!
//! [`ListQuery::prepare`] does all request validation up front, before any
//! repository is touched. [`ListQuery::execute`] is then a pure transform
//! over the materialized candidates: search, sort, page.

use tracing::debug;

use super::mapping::PropertyMappingRegistry;
use super::paging::{PageRequest, PagedList, PagingLimits};
use super::params::ResourceParameters;
use super::shaping::{FieldSpec, ShapedRecord, shape};
use super::sorting::SortPlan;
use crate::error::Result;
use crate::model::Resource;

#[derive(Debug)]
pub struct ListQuery<R: Resource> {
    sort: SortPlan<R>,
    fields: FieldSpec,
    page: PageRequest,
    search: Option<String>,
}

impl<R: Resource> ListQuery<R> {
    /// Validate sort keys and field names for `R` and resolve paging.
    pub fn prepare(
        registry: &PropertyMappingRegistry,
        params: &ResourceParameters,
        limits: PagingLimits,
    ) -> Result<Self> {
        let mapping = registry.mapping::<R, R::Dto>()?;
        let expression = mapping.validate_sort_expression(params.order_by_or(R::DEFAULT_ORDER_BY))?;
        let sort = SortPlan::compile(&expression, mapping)?;
        let fields = FieldSpec::validate_for::<R::Dto>(params.fields.as_deref())?;

        Ok(Self {
            sort,
            fields,
            page: params.page_request(limits),
            search: params.search_needle(),
        })
    }

    pub fn execute(&self, mut candidates: Vec<R>) -> PagedList<R> {
        let before = candidates.len();
        if let Some(needle) = &self.search {
            candidates.retain(|item| match item.search_text() {
                Some(text) => text.to_lowercase().contains(needle.as_str()),
                None => true,
            });
        }

        self.sort.apply(&mut candidates);
        let page = PagedList::from_request(candidates, self.page);

        debug!(
            resource = R::NAME,
            candidates = before,
            matched = page.total_count(),
            page = page.current_page(),
            returned = page.items().len(),
            "list query executed"
        );
        page
    }

    /// Shape one entity through its public representation
    pub fn shape(&self, item: &R) -> ShapedRecord {
        shape(&item.to_dto(), &self.fields)
    }

    pub fn fields(&self) -> &FieldSpec {
        &self.fields
    }

    pub fn page_request(&self) -> PageRequest {
        self.page
    }
}

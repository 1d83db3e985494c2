//! Query system for list endpoints
//!
//! Sort keys go through a [`mapping::PropertyMappingRegistry`], pages are cut by
//! [`paging::PagedList`], and records are projected by [`shaping`]. The
//! [`pipeline::ListQuery`] composes the three for any [`crate::model::Resource`].

pub mod mapping;
pub mod paging;
pub mod params;
pub mod pipeline;
pub mod shaping;
pub mod sorting;

pub use mapping::{PropertyMapping, PropertyMappingRegistry, PropertyMappingValue};
pub use paging::{PageRequest, PagedList, PagingLimits, PaginationMetadata};
pub use params::ResourceParameters;
pub use pipeline::ListQuery;
pub use shaping::{FieldAccessor, FieldSpec, Shape, ShapedRecord, shape, shape_all, type_has_properties};
pub use sorting::{SortDirection, SortExpression, SortPlan, SortValue, Sortable};

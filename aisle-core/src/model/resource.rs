//! The per-resource descriptor the generic pipeline and service work from

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ValidationError;
use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::database::ports::ResourceRepository;
use crate::query::shaping::Shape;
use crate::query::sorting::Sortable;

/// Foreign keys a payload points at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct References {
    pub supermarket_id: Option<i64>,
    pub product_id: Option<i64>,
}

/// A creation or update body
pub trait Payload:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + fmt::Debug + 'static
{
    fn validate(&self) -> Result<(), ValidationError>;

    fn references(&self) -> References {
        References::default()
    }
}

/// Equality filter applied by repositories before the list pipeline runs
pub trait ResourceFilter: Clone + Default + Send + Sync + fmt::Debug + PartialEq + 'static {}

impl ResourceFilter for () {}

pub trait Resource: Sortable + Clone + Send + Sync + fmt::Debug + 'static {
    type Dto: Shape + Serialize + Send + Sync + fmt::Debug;
    type ForCreation: Payload;
    type ForUpdate: Payload;
    type Filter: ResourceFilter;

    /// Singular lowercase name, used in messages and link rels
    const NAME: &'static str;

    /// Sort expression used when a request gives none
    const DEFAULT_ORDER_BY: &'static str;

    fn id(&self) -> i64;

    /// The text a `searchQuery` is matched against
    fn search_text(&self) -> Option<&str> {
        None
    }

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn to_dto(&self) -> Self::Dto;

    fn from_creation(id: i64, draft: Self::ForCreation) -> Self;

    fn apply_update(&mut self, update: Self::ForUpdate);

    fn to_update(&self) -> Self::ForUpdate;

    /// Creation body for a PUT on an absent id; `None` means PUT never creates
    fn upsert_draft(_update: &Self::ForUpdate) -> Option<Self::ForCreation> {
        None
    }

    /// Filter selecting rows that would violate a uniqueness rule
    fn conflict_filter(_references: &References) -> Option<Self::Filter> {
        None
    }

    fn repository(unit_of_work: &CatalogUnitOfWork) -> &Arc<dyn ResourceRepository<Self>>;
}

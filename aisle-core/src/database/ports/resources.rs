use async_trait::async_trait;

use crate::error::Result;
use crate::model::Resource;

/// Storage for one resource type.
///
/// `list` returns every row matching the equality filter in storage order;
/// searching, sorting and paging happen afterwards in the list pipeline.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>>;

    async fn get(&self, id: i64) -> Result<Option<R>>;

    /// Rows for the ids that exist, in the order the ids were given
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<R>>;

    async fn insert(&self, draft: R::ForCreation) -> Result<R>;

    /// Persist `entity`; `false` when its id no longer exists
    async fn update(&self, entity: &R) -> Result<bool>;

    /// Delete by id, cascading to dependent rows; `false` when absent
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn exists(&self, id: i64) -> Result<bool>;
}

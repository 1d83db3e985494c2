//! Catalog service: the operations every resource endpoint performs
//!
//! Reads run request validation before any repository access. Writes check,
//! in order: payload validation, referenced rows exist, then uniqueness.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::error::{CatalogError, Result};
use crate::model::{
    Payload, Product, References, Resource, StaffFilter, StaffMember, Stock, StockFilter,
    Supermarket, ValidationError,
};
use crate::patch::JsonPatch;
use crate::query::{
    FieldSpec, ListQuery, PagedList, PagingLimits, PropertyMappingRegistry, ResourceParameters,
    ShapedRecord, shape,
};

/// A validated list query together with the page it produced
#[derive(Debug)]
pub struct ListOutcome<R: Resource> {
    pub query: ListQuery<R>,
    pub page: PagedList<R>,
}

impl<R: Resource> ListOutcome<R> {
    pub fn shaped(&self) -> Vec<(&R, ShapedRecord)> {
        self.page
            .items()
            .iter()
            .map(|item| (item, self.query.shape(item)))
            .collect()
    }
}

/// Result of a full update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<R> {
    Updated(R),
    /// PUT on an absent id created a new row
    Created(R),
}

#[derive(Clone)]
pub struct CatalogService {
    unit_of_work: Arc<CatalogUnitOfWork>,
    mappings: Arc<PropertyMappingRegistry>,
    limits: PagingLimits,
}

impl fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogService")
            .field("mappings", &self.mappings.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(
        unit_of_work: Arc<CatalogUnitOfWork>,
        mappings: Arc<PropertyMappingRegistry>,
        limits: PagingLimits,
    ) -> Self {
        Self {
            unit_of_work,
            mappings,
            limits,
        }
    }

    pub fn mappings(&self) -> &PropertyMappingRegistry {
        &self.mappings
    }

    pub fn limits(&self) -> PagingLimits {
        self.limits
    }

    pub fn unit_of_work(&self) -> Arc<CatalogUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }

    fn prepare<R: Resource>(&self, params: &ResourceParameters) -> Result<ListQuery<R>> {
        ListQuery::prepare(&self.mappings, params, self.limits).inspect_err(|err| {
            debug!(resource = R::NAME, error = %err, "rejected list request");
        })
    }

    /// Search, sort and page the rows matching `filter`.
    pub async fn list<R: Resource>(
        &self,
        params: &ResourceParameters,
        filter: &R::Filter,
    ) -> Result<ListOutcome<R>> {
        let query = self.prepare::<R>(params)?;
        let candidates = R::repository(&self.unit_of_work).list(filter).await?;
        Ok(ListOutcome {
            page: query.execute(candidates),
            query,
        })
    }

    pub async fn get<R: Resource>(&self, id: i64) -> Result<R> {
        R::repository(&self.unit_of_work)
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(R::NAME, id))
    }

    /// Fetch one row and shape it; field names are checked first.
    pub async fn get_shaped<R: Resource>(
        &self,
        id: i64,
        fields: Option<&str>,
    ) -> Result<(R, ShapedRecord)> {
        let spec = FieldSpec::validate_for::<R::Dto>(fields)?;
        let entity = self.get::<R>(id).await?;
        let shaped = shape(&entity.to_dto(), &spec);
        Ok((entity, shaped))
    }

    pub async fn exists<R: Resource>(&self, id: i64) -> Result<bool> {
        R::repository(&self.unit_of_work).exists(id).await
    }

    pub async fn create<R: Resource>(&self, draft: R::ForCreation) -> Result<R> {
        draft.validate()?;
        let references = draft.references();
        self.check_references(&references).await?;
        self.check_unique::<R>(&references, None).await?;

        let created = R::repository(&self.unit_of_work).insert(draft).await?;
        info!(resource = R::NAME, id = created.id(), "created");
        Ok(created)
    }

    /// Replace every updatable field of row `id`.
    ///
    /// Resources that support upsert create a new row when `id` is absent;
    /// the new row gets a store-assigned id.
    pub async fn update<R: Resource>(
        &self,
        id: i64,
        update: R::ForUpdate,
    ) -> Result<UpdateOutcome<R>> {
        let repository = R::repository(&self.unit_of_work);
        let Some(entity) = repository.get(id).await? else {
            return match R::upsert_draft(&update) {
                Some(draft) => {
                    info!(resource = R::NAME, requested_id = id, "upserting absent row");
                    self.create::<R>(draft).await.map(UpdateOutcome::Created)
                }
                None => Err(CatalogError::not_found(R::NAME, id)),
            };
        };

        self.apply_update(entity, update)
            .await
            .map(UpdateOutcome::Updated)
    }

    /// Apply an RFC 6902 patch to the update form of row `id`, then validate
    /// and store it like a full update.
    pub async fn patch<R: Resource>(&self, id: i64, patch: &JsonPatch) -> Result<R> {
        let entity = self.get::<R>(id).await?;

        let mut document = serde_json::to_value(entity.to_update())
            .map_err(|e| CatalogError::Internal(format!("failed to encode {}: {e}", R::NAME)))?;
        patch
            .apply(&mut document)
            .map_err(|e| ValidationError::Patch(e.to_string()))?;
        let update: R::ForUpdate = serde_json::from_value(document)
            .map_err(|e| ValidationError::Patch(format!("patched document is invalid: {e}")))?;

        self.apply_update(entity, update).await
    }

    async fn apply_update<R: Resource>(&self, mut entity: R, update: R::ForUpdate) -> Result<R> {
        update.validate()?;
        let references = update.references();
        self.check_references(&references).await?;
        self.check_unique::<R>(&references, Some(entity.id())).await?;

        entity.apply_update(update);
        if !R::repository(&self.unit_of_work).update(&entity).await? {
            return Err(CatalogError::not_found(R::NAME, entity.id()));
        }
        info!(resource = R::NAME, id = entity.id(), "updated");
        Ok(entity)
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> Result<()> {
        if !R::repository(&self.unit_of_work).delete(id).await? {
            return Err(CatalogError::not_found(R::NAME, id));
        }
        info!(resource = R::NAME, id, "deleted");
        Ok(())
    }

    /// Create a batch. Every draft is validated, and checked against
    /// existing rows and the rest of the batch, before anything is inserted.
    pub async fn create_many<R: Resource>(&self, drafts: Vec<R::ForCreation>) -> Result<Vec<R>> {
        if drafts.is_empty() {
            return Err(CatalogError::MalformedPayload(format!(
                "{} collection is empty",
                R::NAME
            )));
        }

        let mut seen = HashSet::new();
        for draft in &drafts {
            draft.validate()?;
            let references = draft.references();
            self.check_references(&references).await?;
            self.check_unique::<R>(&references, None).await?;
            if R::conflict_filter(&references).is_some() && !seen.insert(references_key(&references)) {
                return Err(CatalogError::Conflict(format!(
                    "{} collection contains a duplicate",
                    R::NAME
                )));
            }
        }

        let repository = R::repository(&self.unit_of_work);
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(repository.insert(draft).await?);
        }
        info!(resource = R::NAME, count = created.len(), "created collection");
        Ok(created)
    }

    /// Rows for every id, in request order; one missing id fails the call.
    pub async fn get_many<R: Resource>(&self, ids: &[i64]) -> Result<Vec<R>> {
        let rows = R::repository(&self.unit_of_work).get_many(ids).await?;
        if rows.len() != ids.len() {
            let found: HashSet<i64> = rows.iter().map(Resource::id).collect();
            let missing: Vec<String> = ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(i64::to_string)
                .collect();
            return Err(CatalogError::NotFound(format!(
                "{} ids {} do not exist",
                R::NAME,
                missing.join(",")
            )));
        }
        Ok(rows)
    }

    /// Products stocked by one supermarket, through the list pipeline
    pub async fn list_supermarket_products(
        &self,
        supermarket_id: i64,
        params: &ResourceParameters,
    ) -> Result<ListOutcome<Product>> {
        let query = self.prepare::<Product>(params)?;
        self.require::<Supermarket>(supermarket_id).await?;

        let stock = self
            .unit_of_work
            .stock
            .list(&StockFilter {
                supermarket_id: Some(supermarket_id),
                product_id: None,
            })
            .await?;
        let product_ids: Vec<i64> = stock.iter().map(|row| row.product_id).collect();
        let products = self.unit_of_work.products.get_many(&product_ids).await?;

        Ok(ListOutcome {
            page: query.execute(products),
            query,
        })
    }

    /// Staff of one supermarket, through the list pipeline
    pub async fn list_supermarket_staff(
        &self,
        supermarket_id: i64,
        params: &ResourceParameters,
    ) -> Result<ListOutcome<StaffMember>> {
        let query = self.prepare::<StaffMember>(params)?;
        self.require::<Supermarket>(supermarket_id).await?;

        let staff = self
            .unit_of_work
            .staff_members
            .list(&StaffFilter {
                supermarket_id: Some(supermarket_id),
            })
            .await?;

        Ok(ListOutcome {
            page: query.execute(staff),
            query,
        })
    }

    /// Delete the stock row linking a supermarket and a product
    pub async fn remove_product_from_supermarket(
        &self,
        supermarket_id: i64,
        product_id: i64,
    ) -> Result<()> {
        self.require::<Supermarket>(supermarket_id).await?;
        self.require::<Product>(product_id).await?;

        let rows = self
            .unit_of_work
            .stock
            .list(&StockFilter {
                supermarket_id: Some(supermarket_id),
                product_id: Some(product_id),
            })
            .await?;
        let Some(row) = rows.first() else {
            return Err(CatalogError::NotFound(format!(
                "supermarket {supermarket_id} does not stock product {product_id}"
            )));
        };

        self.delete::<Stock>(row.id).await
    }

    async fn require<R: Resource>(&self, id: i64) -> Result<()> {
        if self.exists::<R>(id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(R::NAME, id))
        }
    }

    async fn check_references(&self, references: &References) -> Result<()> {
        if let Some(id) = references.supermarket_id {
            if !self.exists::<Supermarket>(id).await? {
                return Err(ValidationError::MissingReference {
                    field: "SupermarketId",
                    id,
                }
                .into());
            }
        }
        if let Some(id) = references.product_id {
            if !self.exists::<Product>(id).await? {
                return Err(ValidationError::MissingReference {
                    field: "ProductId",
                    id,
                }
                .into());
            }
        }
        Ok(())
    }

    async fn check_unique<R: Resource>(
        &self,
        references: &References,
        own_id: Option<i64>,
    ) -> Result<()> {
        let Some(filter) = R::conflict_filter(references) else {
            return Ok(());
        };
        let clashes = R::repository(&self.unit_of_work).list(&filter).await?;
        if clashes.iter().any(|row| Some(row.id()) != own_id) {
            debug!(resource = R::NAME, ?references, "uniqueness conflict");
            return Err(CatalogError::Conflict(format!(
                "{} already exists for this supermarket and product",
                R::NAME
            )));
        }
        Ok(())
    }
}

fn references_key(references: &References) -> (Option<i64>, Option<i64>) {
    (references.supermarket_id, references.product_id)
}

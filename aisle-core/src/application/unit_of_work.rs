use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::memory::InMemoryCatalog;
#[cfg(feature = "database")]
use crate::database::{
    infrastructure::postgres::PostgresResourceRepository, postgres::PostgresDatabase,
};
use crate::database::ports::ResourceRepository;
use crate::model::{Product, StaffMember, Stock, Supermarket};

/// Aggregates the repository ports used by the catalog service.
#[derive(Clone)]
pub struct CatalogUnitOfWork {
    pub supermarkets: Arc<dyn ResourceRepository<Supermarket>>,
    pub products: Arc<dyn ResourceRepository<Product>>,
    pub staff_members: Arc<dyn ResourceRepository<StaffMember>>,
    pub stock: Arc<dyn ResourceRepository<Stock>>,
}

impl fmt::Debug for CatalogUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogUnitOfWork")
            .field("supermarkets", &type_name_of_val(self.supermarkets.as_ref()))
            .field("products", &type_name_of_val(self.products.as_ref()))
            .field("staff_members", &type_name_of_val(self.staff_members.as_ref()))
            .field("stock", &type_name_of_val(self.stock.as_ref()))
            .finish()
    }
}

impl CatalogUnitOfWork {
    /// Every repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryCatalog::new())
    }

    pub fn from_in_memory(store: InMemoryCatalog) -> Self {
        Self {
            supermarkets: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            staff_members: Arc::new(store.clone()),
            stock: Arc::new(store),
        }
    }
}

#[derive(Default)]
pub struct CatalogUnitOfWorkBuilder {
    supermarkets: Option<Arc<dyn ResourceRepository<Supermarket>>>,
    products: Option<Arc<dyn ResourceRepository<Product>>>,
    staff_members: Option<Arc<dyn ResourceRepository<StaffMember>>>,
    stock: Option<Arc<dyn ResourceRepository<Stock>>>,
}

impl fmt::Debug for CatalogUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogUnitOfWorkBuilder")
            .field("supermarkets", &self.supermarkets.is_some())
            .field("products", &self.products.is_some())
            .field("staff_members", &self.staff_members.is_some())
            .field("stock", &self.stock.is_some())
            .finish()
    }
}

impl CatalogUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supermarkets(mut self, repo: Arc<dyn ResourceRepository<Supermarket>>) -> Self {
        self.supermarkets = Some(repo);
        self
    }

    pub fn with_products(mut self, repo: Arc<dyn ResourceRepository<Product>>) -> Self {
        self.products = Some(repo);
        self
    }

    pub fn with_staff_members(mut self, repo: Arc<dyn ResourceRepository<StaffMember>>) -> Self {
        self.staff_members = Some(repo);
        self
    }

    pub fn with_stock(mut self, repo: Arc<dyn ResourceRepository<Stock>>) -> Self {
        self.stock = Some(repo);
        self
    }

    /// Build the unit of work. Returns a string error naming the first
    /// missing repository.
    pub fn build(self) -> Result<CatalogUnitOfWork, String> {
        Ok(CatalogUnitOfWork {
            supermarkets: self
                .supermarkets
                .ok_or_else(|| "missing supermarket repository".to_string())?,
            products: self
                .products
                .ok_or_else(|| "missing product repository".to_string())?,
            staff_members: self
                .staff_members
                .ok_or_else(|| "missing staff member repository".to_string())?,
            stock: self
                .stock
                .ok_or_else(|| "missing stock repository".to_string())?,
        })
    }
}

#[cfg(feature = "database")]
impl CatalogUnitOfWork {
    /// Compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: &PostgresDatabase) -> Result<Self, String> {
        CatalogUnitOfWorkBuilder::new().with_postgres(db).build()
    }
}

#[cfg(feature = "database")]
impl CatalogUnitOfWorkBuilder {
    /// Populate the builder with Postgres-backed repository adapters.
    pub fn with_postgres(self, db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();
        self.with_supermarkets(Arc::new(PostgresResourceRepository::<Supermarket>::new(
            pool.clone(),
        )))
        .with_products(Arc::new(PostgresResourceRepository::<Product>::new(pool.clone())))
        .with_staff_members(Arc::new(PostgresResourceRepository::<StaffMember>::new(
            pool.clone(),
        )))
        .with_stock(Arc::new(PostgresResourceRepository::<Stock>::new(pool)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_reports_missing_repository() {
        let store = InMemoryCatalog::new();
        let err = CatalogUnitOfWorkBuilder::new()
            .with_supermarkets(Arc::new(store.clone()))
            .with_products(Arc::new(store))
            .build()
            .unwrap_err();
        assert_eq!(err, "missing staff member repository");
    }

    #[test]
    fn test_builder_accepts_full_set() {
        let store = InMemoryCatalog::new();
        let uow = CatalogUnitOfWorkBuilder::new()
            .with_supermarkets(Arc::new(store.clone()))
            .with_products(Arc::new(store.clone()))
            .with_staff_members(Arc::new(store.clone()))
            .with_stock(Arc::new(store))
            .build();
        assert!(uow.is_ok());
    }
}

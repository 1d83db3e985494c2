//! In-memory catalog store
//!
//! All four tables sit behind one `tokio::sync::RwLock` so cascading deletes
//! see a consistent view. Ids come from per-table counters starting at 1 and
//! are never reused.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::ports::ResourceRepository;
use crate::error::{CatalogError, Result};
use crate::model::{Product, Resource, StaffMember, Stock, Supermarket, ValidationError};

#[derive(Debug)]
pub struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<R> Table<R> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn remove_where(&mut self, predicate: impl Fn(&R) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(row));
        before - self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Tables {
    supermarkets: Table<Supermarket>,
    products: Table<Product>,
    staff_members: Table<StaffMember>,
    stock: Table<Stock>,
}

/// Table access for a resource stored in [`Tables`]
pub trait MemoryTable: Resource {
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Remove rows that depend on the deleted `id`
    fn cascade(_tables: &mut Tables, _id: i64) {}

    /// Reject `row` if it would dangle or clash. Runs under the write lock.
    fn admit(_tables: &Tables, _row: &Self) -> Result<()> {
        Ok(())
    }
}

fn require_row<R>(table: &Table<R>, field: &'static str, id: i64) -> Result<()> {
    if table.rows.contains_key(&id) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference { field, id }.into())
    }
}

impl MemoryTable for Supermarket {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.supermarkets
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.supermarkets
    }

    fn cascade(tables: &mut Tables, id: i64) {
        let stock = tables.stock.remove_where(|row| row.supermarket_id == id);
        let staff = tables.staff_members.remove_where(|row| row.supermarket_id == id);
        debug!(supermarket_id = id, stock, staff, "cascaded supermarket delete");
    }
}

impl MemoryTable for Product {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.products
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.products
    }

    fn cascade(tables: &mut Tables, id: i64) {
        let stock = tables.stock.remove_where(|row| row.product_id == id);
        debug!(product_id = id, stock, "cascaded product delete");
    }
}

impl MemoryTable for StaffMember {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.staff_members
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.staff_members
    }

    fn admit(tables: &Tables, row: &Self) -> Result<()> {
        require_row(&tables.supermarkets, "SupermarketId", row.supermarket_id)
    }
}

impl MemoryTable for Stock {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.stock
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.stock
    }

    fn admit(tables: &Tables, row: &Self) -> Result<()> {
        require_row(&tables.supermarkets, "SupermarketId", row.supermarket_id)?;
        require_row(&tables.products, "ProductId", row.product_id)?;

        let clash = tables.stock.rows.values().any(|other| {
            other.id != row.id
                && other.supermarket_id == row.supermarket_id
                && other.product_id == row.product_id
        });
        if clash {
            return Err(CatalogError::Conflict(format!(
                "stock already exists for supermarket {} and product {}",
                row.supermarket_id, row.product_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<R: MemoryTable> ResourceRepository<R> for InMemoryCatalog {
    async fn list(&self, filter: &R::Filter) -> Result<Vec<R>> {
        let tables = self.tables.read().await;
        Ok(R::table(&tables)
            .rows
            .values()
            .filter(|row| row.matches(filter))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<R>> {
        let tables = self.tables.read().await;
        Ok(R::table(&tables).rows.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<R>> {
        let tables = self.tables.read().await;
        let table = R::table(&tables);
        Ok(ids.iter().filter_map(|id| table.rows.get(id).cloned()).collect())
    }

    async fn insert(&self, draft: R::ForCreation) -> Result<R> {
        let mut tables = self.tables.write().await;
        let row = R::from_creation(R::table(&tables).next_id, draft);
        R::admit(&tables, &row)?;

        let table = R::table_mut(&mut tables);
        let id = table.allocate_id();
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, entity: &R) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !R::table(&tables).rows.contains_key(&entity.id()) {
            return Ok(false);
        }
        R::admit(&tables, entity)?;

        match R::table_mut(&mut tables).rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if R::table_mut(&mut tables).rows.remove(&id).is_none() {
            return Ok(false);
        }
        R::cascade(&mut tables, id);
        Ok(true)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(R::table(&tables).rows.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ProductForCreation, StaffFilter, StaffMemberForCreation, StockFilter, StockForCreation,
        SupermarketForCreation,
    };

    async fn seed(store: &InMemoryCatalog) -> (Supermarket, Product) {
        let market = ResourceRepository::<Supermarket>::insert(
            store,
            SupermarketForCreation {
                location: "Oslo".into(),
                number_of_staff: 2,
            },
        )
        .await
        .unwrap();
        let milk = ResourceRepository::<Product>::insert(
            store,
            ProductForCreation {
                name: "Milk".into(),
                price: 2.5,
            },
        )
        .await
        .unwrap();
        ResourceRepository::<Stock>::insert(
            store,
            StockForCreation {
                supermarket_id: market.id,
                product_id: milk.id,
                number_in_stock: 10,
            },
        )
        .await
        .unwrap();
        ResourceRepository::<StaffMember>::insert(
            store,
            StaffMemberForCreation {
                name: "Kari".into(),
                phone_number: "555".into(),
                address: "Storgata 1".into(),
                supermarket_id: market.id,
            },
        )
        .await
        .unwrap();
        (market, milk)
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let store = InMemoryCatalog::new();
        let (market, milk) = seed(&store).await;
        assert_eq!(market.id, 1);
        assert_eq!(milk.id, 1);

        let second = ResourceRepository::<Product>::insert(
            &store,
            ProductForCreation {
                name: "Bread".into(),
                price: 3.0,
            },
        )
        .await
        .unwrap();
        // the rejected duplicate did not consume an id
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_deleting_supermarket_cascades() {
        let store = InMemoryCatalog::new();
        let (market, milk) = seed(&store).await;

        assert!(ResourceRepository::<Supermarket>::delete(&store, market.id).await.unwrap());
        let stock = ResourceRepository::<Stock>::list(&store, &StockFilter::default())
            .await
            .unwrap();
        let staff = ResourceRepository::<StaffMember>::list(&store, &StaffFilter::default())
            .await
            .unwrap();
        assert!(stock.is_empty());
        assert!(staff.is_empty());
        assert!(ResourceRepository::<Product>::exists(&store, milk.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_product_removes_its_stock() {
        let store = InMemoryCatalog::new();
        let (_, milk) = seed(&store).await;
        assert!(ResourceRepository::<Product>::delete(&store, milk.id).await.unwrap());
        let stock = ResourceRepository::<Stock>::list(&store, &StockFilter::default())
            .await
            .unwrap();
        assert!(stock.is_empty());
        assert!(!ResourceRepository::<Product>::delete(&store, milk.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_many_keeps_requested_order_and_skips_missing() {
        let store = InMemoryCatalog::new();
        for name in ["a", "b", "c"] {
            ResourceRepository::<Product>::insert(
                &store,
                ProductForCreation {
                    name: name.into(),
                    price: 1.0,
                },
            )
            .await
            .unwrap();
        }
        let rows = ResourceRepository::<Product>::get_many(&store, &[3, 9, 1])
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_insert_rechecks_references_under_lock() {
        let store = InMemoryCatalog::new();
        let (market, milk) = seed(&store).await;

        let dangling = ResourceRepository::<Stock>::insert(
            &store,
            StockForCreation {
                supermarket_id: market.id + 7,
                product_id: milk.id,
                number_in_stock: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            dangling,
            CatalogError::Validation(ValidationError::MissingReference {
                field: "SupermarketId",
                ..
            })
        ));

        let orphan = ResourceRepository::<StaffMember>::insert(
            &store,
            StaffMemberForCreation {
                name: "Ola".into(),
                phone_number: "556".into(),
                address: "Storgata 2".into(),
                supermarket_id: 99,
            },
        )
        .await;
        assert!(orphan.is_err());

        let stock = ResourceRepository::<Stock>::list(&store, &StockFilter::default())
            .await
            .unwrap();
        assert_eq!(stock.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_stock_pair_is_a_conflict() {
        let store = InMemoryCatalog::new();
        let (market, milk) = seed(&store).await;

        let duplicate = ResourceRepository::<Stock>::insert(
            &store,
            StockForCreation {
                supermarket_id: market.id,
                product_id: milk.id,
                number_in_stock: 4,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(duplicate, CatalogError::Conflict(_)));

        let bread = ResourceRepository::<Product>::insert(
            &store,
            ProductForCreation {
                name: "Bread".into(),
                price: 3.0,
            },
        )
        .await
        .unwrap();
        let second = ResourceRepository::<Stock>::insert(
            &store,
            StockForCreation {
                supermarket_id: market.id,
                product_id: bread.id,
                number_in_stock: 2,
            },
        )
        .await
        .unwrap();
        // the rejected duplicate did not consume an id
        assert_eq!(second.id, 2);

        let moved = Stock {
            product_id: milk.id,
            ..second.clone()
        };
        let clash = ResourceRepository::<Stock>::update(&store, &moved).await.unwrap_err();
        assert!(matches!(clash, CatalogError::Conflict(_)));

        let restocked = Stock {
            number_in_stock: 20,
            ..second
        };
        assert!(ResourceRepository::<Stock>::update(&store, &restocked).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_row_reports_false() {
        let store = InMemoryCatalog::new();
        let ghost = Product {
            id: 42,
            name: "ghost".into(),
            price: 1.0,
        };
        assert!(!ResourceRepository::<Product>::update(&store, &ghost).await.unwrap());
    }
}

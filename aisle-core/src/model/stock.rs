use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::validation::{ValidationError, check_range};
use super::{Payload, References, Resource, ResourceFilter};
use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::database::ports::ResourceRepository;
use crate::query::shaping::{FieldAccessor, Shape};
use crate::query::sorting::{SortValue, Sortable};

pub const MAX_NUMBER_IN_STOCK: i32 = 100_000_000;

/// How many of one product one supermarket holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Stock {
    pub id: i64,
    pub supermarket_id: i64,
    pub product_id: i64,
    pub number_in_stock: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDto {
    pub id: i64,
    pub supermarket_id: i64,
    pub product_id: i64,
    pub number_in_stock: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockForCreation {
    pub supermarket_id: i64,
    pub product_id: i64,
    pub number_in_stock: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockForUpdate {
    pub supermarket_id: i64,
    pub product_id: i64,
    pub number_in_stock: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockFilter {
    pub supermarket_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl ResourceFilter for StockFilter {}

impl Payload for StockForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range("NumberInStock", self.number_in_stock, 0, MAX_NUMBER_IN_STOCK)
    }

    fn references(&self) -> References {
        References {
            supermarket_id: Some(self.supermarket_id),
            product_id: Some(self.product_id),
        }
    }
}

impl Payload for StockForUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range("NumberInStock", self.number_in_stock, 0, MAX_NUMBER_IN_STOCK)
    }

    fn references(&self) -> References {
        References {
            supermarket_id: Some(self.supermarket_id),
            product_id: Some(self.product_id),
        }
    }
}

impl Shape for StockDto {
    fn accessors() -> &'static [FieldAccessor<Self>] {
        const FIELDS: &[FieldAccessor<StockDto>] = &[
            FieldAccessor::new("id", |s| json!(s.id)),
            FieldAccessor::new("supermarketId", |s| json!(s.supermarket_id)),
            FieldAccessor::new("productId", |s| json!(s.product_id)),
            FieldAccessor::new("numberInStock", |s| json!(s.number_in_stock)),
        ];
        FIELDS
    }
}

impl Sortable for Stock {
    const SORT_FIELDS: &'static [&'static str] =
        &["Id", "SupermarketId", "ProductId", "NumberInStock"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "Id" => Some(SortValue::integer(self.id)),
            "SupermarketId" => Some(SortValue::integer(self.supermarket_id)),
            "ProductId" => Some(SortValue::integer(self.product_id)),
            "NumberInStock" => Some(SortValue::integer(self.number_in_stock)),
            _ => None,
        }
    }
}

impl Resource for Stock {
    type Dto = StockDto;
    type ForCreation = StockForCreation;
    type ForUpdate = StockForUpdate;
    type Filter = StockFilter;

    const NAME: &'static str = "stock";
    const DEFAULT_ORDER_BY: &'static str = "Id";

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &StockFilter) -> bool {
        filter.supermarket_id.is_none_or(|id| id == self.supermarket_id)
            && filter.product_id.is_none_or(|id| id == self.product_id)
    }

    fn to_dto(&self) -> StockDto {
        StockDto {
            id: self.id,
            supermarket_id: self.supermarket_id,
            product_id: self.product_id,
            number_in_stock: self.number_in_stock,
        }
    }

    fn from_creation(id: i64, draft: StockForCreation) -> Self {
        Stock {
            id,
            supermarket_id: draft.supermarket_id,
            product_id: draft.product_id,
            number_in_stock: draft.number_in_stock,
        }
    }

    fn apply_update(&mut self, update: StockForUpdate) {
        self.supermarket_id = update.supermarket_id;
        self.product_id = update.product_id;
        self.number_in_stock = update.number_in_stock;
    }

    fn to_update(&self) -> StockForUpdate {
        StockForUpdate {
            supermarket_id: self.supermarket_id,
            product_id: self.product_id,
            number_in_stock: self.number_in_stock,
        }
    }

    /// One row per (supermarket, product)
    fn conflict_filter(references: &References) -> Option<StockFilter> {
        Some(StockFilter {
            supermarket_id: Some(references.supermarket_id?),
            product_id: Some(references.product_id?),
        })
    }

    fn repository(unit_of_work: &CatalogUnitOfWork) -> &Arc<dyn ResourceRepository<Self>> {
        &unit_of_work.stock
    }
}

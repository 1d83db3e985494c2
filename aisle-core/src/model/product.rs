use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::validation::{ValidationError, check_range, check_text};
use super::{Payload, Resource};
use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::database::ports::ResourceRepository;
use crate::query::shaping::{FieldAccessor, Shape};
use crate::query::sorting::{SortValue, Sortable};

pub const NAME_MAX_LEN: usize = 50;
pub const MAX_PRICE: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductForCreation {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductForUpdate {
    pub name: String,
    pub price: f64,
}

fn validate_fields(name: &str, price: f64) -> Result<(), ValidationError> {
    check_text("Name", name, NAME_MAX_LEN)?;
    check_range("Price", price, 0.0, MAX_PRICE)
}

impl Payload for ProductForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.price)
    }
}

impl Payload for ProductForUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, self.price)
    }
}

impl Shape for ProductDto {
    fn accessors() -> &'static [FieldAccessor<Self>] {
        const FIELDS: &[FieldAccessor<ProductDto>] = &[
            FieldAccessor::new("productId", |p| json!(p.product_id)),
            FieldAccessor::new("name", |p| json!(p.name)),
            FieldAccessor::new("price", |p| json!(p.price)),
        ];
        FIELDS
    }
}

impl Sortable for Product {
    const SORT_FIELDS: &'static [&'static str] = &["ProductId", "Name", "Price"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "ProductId" => Some(SortValue::integer(self.id)),
            "Name" => Some(SortValue::text(self.name.as_str())),
            "Price" => Some(SortValue::float(self.price)),
            _ => None,
        }
    }
}

impl Resource for Product {
    type Dto = ProductDto;
    type ForCreation = ProductForCreation;
    type ForUpdate = ProductForUpdate;
    type Filter = ();

    const NAME: &'static str = "product";
    const DEFAULT_ORDER_BY: &'static str = "ProductId";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn to_dto(&self) -> ProductDto {
        ProductDto {
            product_id: self.id,
            name: self.name.clone(),
            price: self.price,
        }
    }

    fn from_creation(id: i64, draft: ProductForCreation) -> Self {
        Product {
            id,
            name: draft.name,
            price: draft.price,
        }
    }

    fn apply_update(&mut self, update: ProductForUpdate) {
        self.name = update.name;
        self.price = update.price;
    }

    fn to_update(&self) -> ProductForUpdate {
        ProductForUpdate {
            name: self.name.clone(),
            price: self.price,
        }
    }

    fn repository(unit_of_work: &CatalogUnitOfWork) -> &Arc<dyn ResourceRepository<Self>> {
        &unit_of_work.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::shaping::{FieldSpec, shape};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_name_only() {
        let milk = Product {
            id: 5,
            name: "Milk".into(),
            price: 2.5,
        };
        let spec = FieldSpec::validate_for::<ProductDto>(Some("Name")).unwrap();
        let shaped = shape(&milk.to_dto(), &spec);
        assert_eq!(serde_json::Value::from(shaped), json!({ "name": "Milk" }));
    }

    #[test]
    fn test_full_shape_matches_dto() {
        let milk = Product {
            id: 5,
            name: "Milk".into(),
            price: 2.5,
        };
        let shaped = shape(&milk.to_dto(), &FieldSpec::All);
        assert_eq!(
            serde_json::Value::from(shaped),
            serde_json::to_value(milk.to_dto()).unwrap()
        );
    }

    #[test]
    fn test_price_bounds() {
        let ok = ProductForCreation {
            name: "Bread".into(),
            price: MAX_PRICE,
        };
        assert!(ok.validate().is_ok());
        let negative = ProductForUpdate {
            name: "Bread".into(),
            price: -1.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_put_never_creates() {
        assert!(Product::upsert_draft(&ProductForUpdate::default()).is_none());
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::validation::{ValidationError, check_range, check_text};
use super::{Payload, Resource};
use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::database::ports::ResourceRepository;
use crate::query::shaping::{FieldAccessor, Shape};
use crate::query::sorting::{SortValue, Sortable};

pub const LOCATION_MAX_LEN: usize = 50;
pub const MAX_NUMBER_OF_STAFF: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Supermarket {
    pub id: i64,
    pub location: String,
    pub number_of_staff: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupermarketDto {
    pub supermarket_id: i64,
    pub location: String,
    pub number_of_staff: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupermarketForCreation {
    pub location: String,
    pub number_of_staff: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupermarketForUpdate {
    pub location: String,
    pub number_of_staff: i32,
}

fn validate_fields(location: &str, number_of_staff: i32) -> Result<(), ValidationError> {
    check_text("Location", location, LOCATION_MAX_LEN)?;
    check_range("NumberOfStaff", number_of_staff, 0, MAX_NUMBER_OF_STAFF)
}

impl Payload for SupermarketForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.location, self.number_of_staff)
    }
}

impl Payload for SupermarketForUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.location, self.number_of_staff)
    }
}

impl Shape for SupermarketDto {
    fn accessors() -> &'static [FieldAccessor<Self>] {
        const FIELDS: &[FieldAccessor<SupermarketDto>] = &[
            FieldAccessor::new("supermarketId", |s| json!(s.supermarket_id)),
            FieldAccessor::new("location", |s| json!(s.location)),
            FieldAccessor::new("numberOfStaff", |s| json!(s.number_of_staff)),
        ];
        FIELDS
    }
}

impl Sortable for Supermarket {
    const SORT_FIELDS: &'static [&'static str] = &["SupermarketId", "Location", "NumberOfStaff"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "SupermarketId" => Some(SortValue::integer(self.id)),
            "Location" => Some(SortValue::text(self.location.as_str())),
            "NumberOfStaff" => Some(SortValue::integer(self.number_of_staff)),
            _ => None,
        }
    }
}

impl Resource for Supermarket {
    type Dto = SupermarketDto;
    type ForCreation = SupermarketForCreation;
    type ForUpdate = SupermarketForUpdate;
    type Filter = ();

    const NAME: &'static str = "supermarket";
    const DEFAULT_ORDER_BY: &'static str = "SupermarketId";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.location)
    }

    fn matches(&self, _filter: &()) -> bool {
        true
    }

    fn to_dto(&self) -> SupermarketDto {
        SupermarketDto {
            supermarket_id: self.id,
            location: self.location.clone(),
            number_of_staff: self.number_of_staff,
        }
    }

    fn from_creation(id: i64, draft: SupermarketForCreation) -> Self {
        Supermarket {
            id,
            location: draft.location,
            number_of_staff: draft.number_of_staff,
        }
    }

    fn apply_update(&mut self, update: SupermarketForUpdate) {
        self.location = update.location;
        self.number_of_staff = update.number_of_staff;
    }

    fn to_update(&self) -> SupermarketForUpdate {
        SupermarketForUpdate {
            location: self.location.clone(),
            number_of_staff: self.number_of_staff,
        }
    }

    fn upsert_draft(update: &SupermarketForUpdate) -> Option<SupermarketForCreation> {
        Some(SupermarketForCreation {
            location: update.location.clone(),
            number_of_staff: update.number_of_staff,
        })
    }

    fn repository(unit_of_work: &CatalogUnitOfWork) -> &Arc<dyn ResourceRepository<Self>> {
        &unit_of_work.supermarkets
    }
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::validation::{ValidationError, check_text};
use super::{Payload, References, Resource, ResourceFilter};
use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::database::ports::ResourceRepository;
use crate::query::shaping::{FieldAccessor, Shape};
use crate::query::sorting::{SortValue, Sortable};

pub const NAME_MAX_LEN: usize = 50;
pub const PHONE_NUMBER_MAX_LEN: usize = 20;
pub const ADDRESS_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub supermarket_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMemberDto {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub supermarket_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffMemberForCreation {
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub supermarket_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffMemberForUpdate {
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub supermarket_id: i64,
}

/// Staff of one supermarket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaffFilter {
    pub supermarket_id: Option<i64>,
}

impl ResourceFilter for StaffFilter {}

fn validate_fields(name: &str, phone_number: &str, address: &str) -> Result<(), ValidationError> {
    check_text("Name", name, NAME_MAX_LEN)?;
    check_text("PhoneNumber", phone_number, PHONE_NUMBER_MAX_LEN)?;
    check_text("Address", address, ADDRESS_MAX_LEN)
}

impl Payload for StaffMemberForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.phone_number, &self.address)
    }

    fn references(&self) -> References {
        References {
            supermarket_id: Some(self.supermarket_id),
            product_id: None,
        }
    }
}

impl Payload for StaffMemberForUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.phone_number, &self.address)
    }

    fn references(&self) -> References {
        References {
            supermarket_id: Some(self.supermarket_id),
            product_id: None,
        }
    }
}

impl Shape for StaffMemberDto {
    fn accessors() -> &'static [FieldAccessor<Self>] {
        const FIELDS: &[FieldAccessor<StaffMemberDto>] = &[
            FieldAccessor::new("id", |s| json!(s.id)),
            FieldAccessor::new("name", |s| json!(s.name)),
            FieldAccessor::new("phoneNumber", |s| json!(s.phone_number)),
            FieldAccessor::new("address", |s| json!(s.address)),
            FieldAccessor::new("supermarketId", |s| json!(s.supermarket_id)),
        ];
        FIELDS
    }
}

impl Sortable for StaffMember {
    const SORT_FIELDS: &'static [&'static str] =
        &["Id", "Name", "PhoneNumber", "Address", "SupermarketId"];

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "Id" => Some(SortValue::integer(self.id)),
            "Name" => Some(SortValue::text(self.name.as_str())),
            "PhoneNumber" => Some(SortValue::text(self.phone_number.as_str())),
            "Address" => Some(SortValue::text(self.address.as_str())),
            "SupermarketId" => Some(SortValue::integer(self.supermarket_id)),
            _ => None,
        }
    }
}

impl Resource for StaffMember {
    type Dto = StaffMemberDto;
    type ForCreation = StaffMemberForCreation;
    type ForUpdate = StaffMemberForUpdate;
    type Filter = StaffFilter;

    const NAME: &'static str = "staffmember";
    const DEFAULT_ORDER_BY: &'static str = "Id";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn matches(&self, filter: &StaffFilter) -> bool {
        filter
            .supermarket_id
            .is_none_or(|supermarket_id| supermarket_id == self.supermarket_id)
    }

    fn to_dto(&self) -> StaffMemberDto {
        StaffMemberDto {
            id: self.id,
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            supermarket_id: self.supermarket_id,
        }
    }

    fn from_creation(id: i64, draft: StaffMemberForCreation) -> Self {
        StaffMember {
            id,
            name: draft.name,
            phone_number: draft.phone_number,
            address: draft.address,
            supermarket_id: draft.supermarket_id,
        }
    }

    fn apply_update(&mut self, update: StaffMemberForUpdate) {
        self.name = update.name;
        self.phone_number = update.phone_number;
        self.address = update.address;
        self.supermarket_id = update.supermarket_id;
    }

    fn to_update(&self) -> StaffMemberForUpdate {
        StaffMemberForUpdate {
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            supermarket_id: self.supermarket_id,
        }
    }

    fn repository(unit_of_work: &CatalogUnitOfWork) -> &Arc<dyn ResourceRepository<Self>> {
        &unit_of_work.staff_members
    }
}

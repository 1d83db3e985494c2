//! Default property mappings for every catalog resource

use crate::error::Result;
use crate::query::mapping::{PropertyMapping, PropertyMappingRegistry, PropertyMappingValue};

use super::{
    Product, ProductDto, StaffMember, StaffMemberDto, Stock, StockDto, Supermarket, SupermarketDto,
};

fn identity(keys: &[&str]) -> PropertyMapping {
    keys.iter().fold(PropertyMapping::new(), |mapping, key| {
        mapping.with(key, PropertyMappingValue::new([*key]))
    })
}

/// Build the registry used by the catalog service.
///
/// Called once at startup; a duplicate registration surfaces here as a
/// configuration error rather than on a request.
pub fn default_registry() -> Result<PropertyMappingRegistry> {
    let mut registry = PropertyMappingRegistry::new();

    registry.register::<Supermarket, SupermarketDto>(identity(&[
        "SupermarketId",
        "Location",
        "NumberOfStaff",
    ]))?;

    registry.register::<Product, ProductDto>(identity(&["ProductId", "Name", "Price"]))?;

    registry.register::<StaffMember, StaffMemberDto>(identity(&[
        "Id",
        "Name",
        "PhoneNumber",
        "Address",
        "SupermarketId",
    ]))?;

    registry.register::<Stock, StockDto>(
        identity(&["Id", "SupermarketId", "ProductId", "NumberInStock"]).with(
            "Placement",
            PropertyMappingValue::new(["SupermarketId", "ProductId"]),
        ),
    )?;

    Ok(registry)
}

//! Catalog domain model: supermarkets, products, staff members and stock

pub mod mappings;
pub mod product;
pub mod resource;
pub mod staff_member;
pub mod stock;
pub mod supermarket;
pub mod validation;

pub use mappings::default_registry;
pub use product::{Product, ProductDto, ProductForCreation, ProductForUpdate};
pub use resource::{Payload, References, Resource, ResourceFilter};
pub use staff_member::{
    StaffFilter, StaffMember, StaffMemberDto, StaffMemberForCreation, StaffMemberForUpdate,
};
pub use stock::{Stock, StockDto, StockFilter, StockForCreation, StockForUpdate};
pub use supermarket::{Supermarket, SupermarketDto, SupermarketForCreation, SupermarketForUpdate};
pub use validation::ValidationError;

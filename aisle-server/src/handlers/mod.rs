pub mod collections;
pub mod extract;
pub mod resources;
pub mod root;
pub mod supermarkets;

pub mod resources;
pub mod tables;

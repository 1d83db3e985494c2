//! Repository ports the catalog service depends on

pub mod resources;

pub use resources::ResourceRepository;

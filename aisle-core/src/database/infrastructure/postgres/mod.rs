//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::resources::PostgresResourceRepository;
pub use repositories::tables::PostgresTable;

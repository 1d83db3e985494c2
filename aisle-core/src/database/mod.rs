//! Repository ports and their storage adapters

pub mod infrastructure;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

pub use infrastructure::memory::InMemoryCatalog;
#[cfg(feature = "database")]
pub use postgres::PostgresDatabase;

pub mod catalog;

pub use catalog::{CatalogService, ListOutcome, UpdateOutcome};

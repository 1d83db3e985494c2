//! # Aisle Core
//!
//! Core library for the aisle catalog API: supermarkets, the products they
//! stock, their staff and stock levels.
//!
//! ## Overview
//!
//! - **Query pipeline** ([`query`]): property-mapped sorting, lenient paging
//!   and field shaping shared by every list endpoint
//! - **Domain model** ([`model`]): entities, transfer shapes, payload validation
//! - **Repositories** ([`database`]): async ports with PostgreSQL and
//!   in-memory adapters
//! - **Service** ([`services`]): the catalog operations composed over a
//!   [`application::unit_of_work::CatalogUnitOfWork`]
//!
//! ## Feature Flags
//!
//! - `database` (default): PostgreSQL adapter and embedded migrations via SQLx
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use aisle_core::{
//!     application::unit_of_work::CatalogUnitOfWork,
//!     model::{default_registry, Product},
//!     query::{PagingLimits, ResourceParameters},
//!     services::CatalogService,
//! };
//!
//! async fn cheapest_first() -> aisle_core::Result<()> {
//!     let service = CatalogService::new(
//!         Arc::new(CatalogUnitOfWork::in_memory()),
//!         Arc::new(default_registry()?),
//!         PagingLimits::default(),
//!     );
//!     let params = ResourceParameters {
//!         order_by: Some("price, name desc".into()),
//!         fields: Some("name,price".into()),
//!         ..Default::default()
//!     };
//!     let outcome = service.list::<Product>(&params, &()).await?;
//!     println!("{} products", outcome.page.total_count());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod database;
pub mod error;
pub mod model;
pub mod patch;
pub mod query;
pub mod services;

pub use error::{CatalogError, Result};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

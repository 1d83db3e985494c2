//! Sorting for list queries
//!
//! This module provides:
//! - Sort key values extracted from entities
//! - The `Sortable` trait entities implement
//! - `orderBy` expression parsing
//! - Strategy pattern for composable, stable multi-key sorting

pub mod expression;
pub mod keys;
pub mod strategy;
pub mod traits;
pub mod utils;


pub use expression::*;
pub use keys::*;
pub use strategy::*;
pub use traits::*;

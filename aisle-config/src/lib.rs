//! Configuration loading for the aisle server.
//!
//! Values are layered: a `.env` file is loaded into the process environment
//! first, then an optional TOML file supplies defaults, and finally
//! environment variables override whatever the file set. The result passes
//! through guard rails that either reject the configuration outright or
//! attach warnings for the operator.

pub mod loader;
pub mod models;
pub mod sources;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    Config, ConfigMetadata, CorsConfig, DatabaseConfig, PagingConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};

use std::sync::Arc;

use aisle_config::Config;
use aisle_core::{
    application::unit_of_work::CatalogUnitOfWork, database::PostgresDatabase,
    model::default_registry, query::PagingLimits, services::CatalogService,
};
use anyhow::{Context, anyhow};
use tracing::{info, warn};

use super::app_state::AppState;

/// Where the catalog rows live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Postgres,
    InMemory,
}

pub fn paging_limits(config: &Config) -> PagingLimits {
    PagingLimits::new(
        config.paging.default_page_size,
        config.paging.max_page_size,
    )
}

/// Connect to PostgreSQL with the configured pool size.
pub async fn connect_database(
    config: &Config,
) -> anyhow::Result<PostgresDatabase> {
    let url = config.database.url.as_deref().ok_or_else(|| {
        anyhow!("DATABASE_URL must be set unless serving --in-memory")
    })?;

    if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        return Err(anyhow!(
            "Invalid database URL: must start with postgres:// or postgresql://"
        ));
    }

    let max_connections = config.database.max_connections.max(1);
    let database = PostgresDatabase::connect(url, max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!(max_connections, "connected to PostgreSQL");
    Ok(database)
}

/// Wire repositories, mappings and paging limits into the router state.
pub async fn build_state(
    config: Arc<Config>,
    mode: StorageMode,
) -> anyhow::Result<AppState> {
    let unit_of_work = match mode {
        StorageMode::InMemory => {
            warn!("serving from the in-memory store; data is lost on exit");
            CatalogUnitOfWork::in_memory()
        }
        StorageMode::Postgres => {
            let database = connect_database(&config).await?;
            database
                .migrate()
                .await
                .context("database migration failed")?;
            let stats = database.stats();
            info!(
                pool.size = stats.size,
                pool.idle = stats.idle,
                pool.max = stats.max_size,
                "database schema up to date"
            );
            CatalogUnitOfWork::from_postgres(&database).map_err(|missing| {
                anyhow!("failed to assemble repositories: {missing}")
            })?
        }
    };

    let mappings = default_registry().context("invalid property mappings")?;
    let limits = paging_limits(&config);
    info!(
        default_page_size = limits.default_page_size,
        max_page_size = limits.max_page_size,
        mappings = mappings.len(),
        "catalog service ready"
    );

    let catalog =
        CatalogService::new(Arc::new(unit_of_work), Arc::new(mappings), limits);
    Ok(AppState::new(catalog, config))
}

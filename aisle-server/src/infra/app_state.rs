use std::{fmt, sync::Arc};

use aisle_config::Config;
use aisle_core::services::CatalogService;

use crate::hateoas::LinkBuilder;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub config: Arc<Config>,
    pub links: LinkBuilder,
}

impl AppState {
    pub fn new(catalog: CatalogService, config: Arc<Config>) -> Self {
        let links = LinkBuilder::new(config.server.public_url.as_deref());
        Self {
            catalog,
            config,
            links,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("catalog", &self.catalog)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

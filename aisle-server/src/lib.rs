//! # Aisle Server
//!
//! HTTP surface of the aisle catalog: supermarkets, products, staff members
//! and stock levels.
//!
//! Every list endpoint supports `pageNumber`/`pageSize` paging, `orderBy`
//! sorting through the property mappings, `fields` shaping and, where the
//! resource has a text field, `searchQuery`. Clients that send
//! `Accept: application/vnd.idp.hateoas+json` get records wrapped with
//! navigation links.

pub mod errors;
pub mod handlers;
pub mod hateoas;
pub mod infra;
pub mod resources;
pub mod routes;

pub use infra::app_state::AppState;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::infra::cors::cors_layer;

/// Build the full application router with CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors, state.config().dev_mode);

    routes::create_api_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

use aisle_core::model::{Product, StaffMember, Stock, Supermarket};
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    handlers::{collections, resources, root, supermarkets},
    hateoas::API_PREFIX,
    infra::app_state::AppState,
    resources::RestResource,
};

/// Create the API router with every resource mounted under `/api`
pub fn create_api_router() -> Router<AppState> {
    let api = Router::new()
        .route("/", get(root::get_root))
        .merge(resource_routes::<Supermarket>())
        .merge(resource_routes::<Product>())
        .merge(resource_routes::<StaffMember>())
        .merge(resource_routes::<Stock>())
        .merge(collection_routes::<Supermarket>())
        .merge(collection_routes::<Product>())
        .merge(collection_routes::<StaffMember>())
        .merge(collection_routes::<Stock>())
        .merge(supermarket_routes());

    Router::new().nest(API_PREFIX, api)
}

fn resource_routes<R: RestResource>() -> Router<AppState> {
    let collection = format!("/{}", R::ROUTE);
    let item = format!("/{}/{{id}}", R::ROUTE);

    Router::new()
        .route(
            &collection,
            get(resources::list::<R>)
                .post(resources::create::<R>)
                .options(resources::options),
        )
        .route(
            &item,
            get(resources::get::<R>)
                .post(resources::block_create::<R>)
                .put(resources::update::<R>)
                .patch(resources::patch::<R>)
                .delete(resources::delete::<R>),
        )
}

fn collection_routes<R: RestResource>() -> Router<AppState> {
    let base = format!("/{}", R::collection_route());

    Router::new()
        .route(&base, post(collections::create_collection::<R>))
        .route(
            &format!("{base}/{{ids}}"),
            get(collections::get_collection::<R>),
        )
}

fn supermarket_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/supermarkets/{id}/products",
            get(supermarkets::list_products),
        )
        .route(
            "/supermarkets/{id}/staffmembers",
            get(supermarkets::list_staff),
        )
        .route(
            "/supermarkets/{id}/products/{product_id}",
            delete(supermarkets::remove_product),
        )
}

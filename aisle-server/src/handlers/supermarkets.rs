//! Routes nested under one supermarket

use aisle_core::{
    model::{Product, StaffMember},
    query::ResourceParameters,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::{
    extract::{PathParams, QueryParams},
    resources::render_list,
};
use crate::{
    errors::AppResult, hateoas::wants_hateoas, infra::app_state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParams(supermarket_id): PathParams<i64>,
    QueryParams(params): QueryParams<ResourceParameters>,
) -> AppResult<Response> {
    let outcome = state
        .catalog
        .list_supermarket_products(supermarket_id, &params)
        .await?;

    render_list::<Product>(
        &state.links,
        &format!("/supermarkets/{supermarket_id}/products"),
        &params,
        &outcome,
        wants_hateoas(&headers),
    )
}

pub async fn list_staff(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParams(supermarket_id): PathParams<i64>,
    QueryParams(params): QueryParams<ResourceParameters>,
) -> AppResult<Response> {
    let outcome = state
        .catalog
        .list_supermarket_staff(supermarket_id, &params)
        .await?;

    render_list::<StaffMember>(
        &state.links,
        &format!("/supermarkets/{supermarket_id}/staffmembers"),
        &params,
        &outcome,
        wants_hateoas(&headers),
    )
}

pub async fn remove_product(
    State(state): State<AppState>,
    PathParams((supermarket_id, product_id)): PathParams<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .catalog
        .remove_product_from_supermarket(supermarket_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

//! CRUD handlers shared by every resource
//!
//! Each handler is generic over [`RestResource`] and mounted once per
//! resource in [`crate::routes`].

use aisle_core::{
    patch::JsonPatch,
    query::{FieldSpec, ResourceParameters, ShapedRecord, shape},
    services::{ListOutcome, UpdateOutcome},
};
use axum::{
    Json,
    extract::State,
    http::{
        HeaderMap, HeaderName, HeaderValue, StatusCode,
        header::{ALLOW, CONTENT_TYPE, LOCATION},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::extract::{JsonBody, PathParams, QueryParams};
use crate::{
    errors::{AppError, AppResult},
    hateoas::{
        HATEOAS_MEDIA_TYPE, LinkBuilder, LinkDto, PageTarget, X_PAGINATION,
        pagination_header, wants_hateoas,
    },
    infra::app_state::AppState,
    resources::RestResource,
};

pub const COLLECTION_ALLOW: &str = "GET,OPTIONS,POST,HEAD";

#[derive(Debug, Default, Deserialize)]
pub struct FieldsQuery {
    #[serde(default, alias = "Fields")]
    pub fields: Option<String>,
}

pub async fn list<R: RestResource>(
    State(state): State<AppState>,
    headers: HeaderMap,
    QueryParams(params): QueryParams<ResourceParameters>,
) -> AppResult<Response> {
    let outcome = state
        .catalog
        .list::<R>(&params, &<R::Filter as Default>::default())
        .await?;

    render_list(
        &state.links,
        &format!("/{}", R::ROUTE),
        &params,
        &outcome,
        wants_hateoas(&headers),
    )
}

/// Render a list outcome either as a plain array of shaped records or, for
/// the HATEOAS media type, as `{ value, links }` with per-record links.
pub fn render_list<R: RestResource>(
    links: &LinkBuilder,
    path: &str,
    params: &ResourceParameters,
    outcome: &ListOutcome<R>,
    hateoas: bool,
) -> AppResult<Response> {
    let metadata = outcome.page.metadata();
    let request = outcome.query.page_request();

    if hateoas {
        let value: Vec<Value> = outcome
            .shaped()
            .into_iter()
            .map(|(entity, record)| {
                with_links(
                    record,
                    links.item_links::<R>(entity.id(), params.fields.as_deref()),
                )
            })
            .collect::<AppResult<_>>()?;
        let body = serde_json::json!({
            "value": value,
            "links": links.collection_links(path, params, request, &metadata),
        });

        let mut response = Json(body).into_response();
        let headers = response.headers_mut();
        headers.insert(
            HeaderName::from_static(X_PAGINATION),
            pagination_header(&metadata, None)?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(HATEOAS_MEDIA_TYPE),
        );
        return Ok(response);
    }

    let previous = metadata
        .has_previous
        .then(|| links.page_href(path, params, request, PageTarget::Previous));
    let next = metadata
        .has_next
        .then(|| links.page_href(path, params, request, PageTarget::Next));
    let header = pagination_header(
        &metadata,
        Some((previous.as_deref(), next.as_deref())),
    )?;

    let records: Vec<ShapedRecord> = outcome
        .shaped()
        .into_iter()
        .map(|(_, record)| record)
        .collect();

    let mut response = Json(records).into_response();
    response
        .headers_mut()
        .insert(HeaderName::from_static(X_PAGINATION), header);
    Ok(response)
}

fn with_links(
    mut record: ShapedRecord,
    links: Vec<LinkDto>,
) -> AppResult<Value> {
    let links = serde_json::to_value(links)
        .map_err(|err| AppError::internal(format!("links: {err}")))?;
    record.insert("links", links);
    Ok(record.into())
}

pub async fn get<R: RestResource>(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    QueryParams(query): QueryParams<FieldsQuery>,
) -> AppResult<Json<Value>> {
    let fields = query.fields.as_deref();
    let (entity, record) = state.catalog.get_shaped::<R>(id, fields).await?;
    let body = with_links(record, state.links.item_links::<R>(entity.id(), fields))?;
    Ok(Json(body))
}

pub async fn create<R: RestResource>(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<R::ForCreation>,
) -> AppResult<Response> {
    let created = state.catalog.create::<R>(draft).await?;
    let id = created.id();

    let record = shape(&created.to_dto(), &FieldSpec::All);
    let body = with_links(record, state.links.item_links::<R>(id, None))?;
    let location = state.links.href(&format!("/{}/{}", R::ROUTE, id));

    created_at(&location, Json(body))
}

/// `POST /{resource}/{id}` is never a valid create
pub async fn block_create<R: RestResource>(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> AppResult<StatusCode> {
    if state.catalog.exists::<R>(id).await? {
        Err(AppError::conflict(format!("{} {} already exists", R::NAME, id)))
    } else {
        Err(AppError::not_found(format!("{} {} does not exist", R::NAME, id)))
    }
}

pub async fn update<R: RestResource>(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<R::ForUpdate>,
) -> AppResult<Response> {
    match state.catalog.update::<R>(id, update).await? {
        UpdateOutcome::Updated(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        UpdateOutcome::Created(created) => {
            let location = state
                .links
                .href(&format!("/{}/{}", R::ROUTE, created.id()));
            created_at(&location, Json(created.to_dto()))
        }
    }
}

pub async fn patch<R: RestResource>(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(document): JsonBody<JsonPatch>,
) -> AppResult<StatusCode> {
    debug!(resource = R::NAME, id, "applying patch");
    state.catalog.patch::<R>(id, &document).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete<R: RestResource>(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
) -> AppResult<StatusCode> {
    state.catalog.delete::<R>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn options() -> impl IntoResponse {
    (StatusCode::OK, [(ALLOW, COLLECTION_ALLOW)])
}

/// `201 Created` with a `Location` header
pub fn created_at(location: &str, body: impl IntoResponse) -> AppResult<Response> {
    let location = HeaderValue::from_str(location)
        .map_err(|err| AppError::internal(format!("location header: {err}")))?;
    Ok((StatusCode::CREATED, [(LOCATION, location)], body).into_response())
}

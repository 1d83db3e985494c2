use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{hateoas::wants_hateoas, infra::app_state::AppState};

/// Entry point links for hypermedia clients; plain clients get `204`.
pub async fn get_root(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if wants_hateoas(&headers) {
        Json(state.links.root_links()).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

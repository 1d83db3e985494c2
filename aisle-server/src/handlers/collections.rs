//! Bulk create and fetch-by-ids endpoints (`/api/{name}collections`)

use aisle_core::model::Resource;
use axum::{Json, extract::State, response::Response};

use super::{
    extract::{JsonBody, PathParams},
    resources::created_at,
};
use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
    resources::RestResource,
};

pub async fn create_collection<R: RestResource>(
    State(state): State<AppState>,
    JsonBody(drafts): JsonBody<Vec<R::ForCreation>>,
) -> AppResult<Response> {
    let created = state.catalog.create_many::<R>(drafts).await?;

    let ids = created
        .iter()
        .map(|row| row.id().to_string())
        .collect::<Vec<_>>()
        .join(",");
    let location = state
        .links
        .href(&format!("/{}/({})", R::collection_route(), ids));
    let body: Vec<R::Dto> = created.iter().map(Resource::to_dto).collect();

    created_at(&location, Json(body))
}

pub async fn get_collection<R: RestResource>(
    State(state): State<AppState>,
    PathParams(raw): PathParams<String>,
) -> AppResult<Json<Vec<R::Dto>>> {
    let ids = parse_ids(&raw)?;
    let rows = state.catalog.get_many::<R>(&ids).await?;
    Ok(Json(rows.iter().map(Resource::to_dto).collect()))
}

/// Parse `(1,2,3)` (parentheses optional) into distinct ids, keeping the
/// first occurrence of each.
pub fn parse_ids(raw: &str) -> Result<Vec<i64>, AppError> {
    let trimmed = raw.trim();
    let inner = match (trimmed.strip_prefix('('), trimmed.ends_with(')')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => {
            return Err(AppError::bad_request(format!(
                "unbalanced id list `{raw}`"
            )));
        }
    };

    let mut ids = Vec::new();
    for token in inner.split(',') {
        let id: i64 = token.trim().parse().map_err(|_| {
            AppError::bad_request(format!("`{}` is not a valid id", token.trim()))
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parenthesised_list() {
        assert_eq!(parse_ids("(3, 1,2)").unwrap(), vec![3, 1, 2]);
        assert_eq!(parse_ids("7").unwrap(), vec![7]);
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(parse_ids("(2,2,5,2)").unwrap(), vec![2, 5]);
    }

    #[test]
    fn malformed_lists_rejected() {
        for raw in ["()", "(1,,2)", "(1,a)", "(1,2", "1,2)"] {
            assert!(parse_ids(raw).is_err(), "{raw} should be rejected");
        }
    }
}

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use stagepass_catalog::event::Event;
use stagepass_catalog::query::{CatalogQuery, SortKey};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/events", get(list_events))
        .route("/v1/events/{id}", get(get_event))
}

#[derive(Debug, Deserialize)]
struct ListEventsParams {
    search: Option<String>,
    sort: Option<String>,
}

async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<Vec<Event>>, AppError> {
    // Parse the sort key up front so a bad one gets a clear 400
    let sort = params
        .sort
        .as_deref()
        .map(SortKey::from_str)
        .transpose()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let query = CatalogQuery {
        search: params.search,
        sort,
    };
    Ok(Json(query.run(&state.catalog)))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Event>, AppError> {
    state
        .catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("No event with id {}", id)))
}

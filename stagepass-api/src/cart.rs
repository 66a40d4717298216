use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use stagepass_cart::models::CartView;
use stagepass_cart::store::CartError;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/cart", get(get_cart).delete(clear_cart))
        .route("/v1/cart/items", post(add_item))
        .route("/v1/cart/items/{id}", delete(remove_item).patch(update_item))
}

#[derive(Debug, Deserialize)]
struct AddItemRequest {
    event_id: u32,
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct UpdateItemRequest {
    quantity: i64,
}

async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart.view())
}

async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>), AppError> {
    // 1. The cart only holds events the catalog actually sells
    let event = state
        .catalog
        .get(req.event_id)
        .cloned()
        .ok_or_else(|| AppError::NotFoundError(format!("No event with id {}", req.event_id)))?;

    // 2. Add or merge; a missing quantity means one ticket
    let view = state
        .cart
        .add_to_cart(event, req.quantity.unwrap_or(1))
        .await
        .map_err(|e| match e {
            CartError::ZeroQuantity => AppError::ValidationError(e.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_item(
    State(state): State<AppState>,
    Path(event_id): Path<u32>,
    Json(req): Json<UpdateItemRequest>,
) -> Json<CartView> {
    Json(state.cart.update_quantity(event_id, req.quantity).await)
}

async fn remove_item(State(state): State<AppState>, Path(event_id): Path<u32>) -> Json<CartView> {
    Json(state.cart.remove_from_cart(event_id).await)
}

async fn clear_cart(State(state): State<AppState>) -> Json<CartView> {
    Json(state.cart.clear().await)
}

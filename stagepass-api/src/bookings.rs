use axum::{extract::State, routing::get, Extension, Json, Router};

use stagepass_booking::models::Booking;
use stagepass_core::identity::UserProfile;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings", get(list_bookings))
}

/// The signed-in user's booking history, newest first when the store can
/// order it.
async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .recorder
        .fetch_bookings(user.uid)
        .await
        .map_err(|e| AppError::UpstreamError(e.to_string()))?;
    Ok(Json(bookings))
}

use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Extension, Json, Router};
use tracing::info;

use stagepass_booking::models::Booking;
use stagepass_booking::recorder::BookingError;
use stagepass_core::identity::UserProfile;
use stagepass_shared::models::events::BookingRecordedEvent;
use stagepass_store::StorefrontEvent;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/checkout", post(checkout))
}

async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    // 1. Nothing to buy, nothing to record
    if state.cart.view().is_empty() {
        return Err(AppError::ValidationError("Your cart is empty".to_string()));
    }

    // 2. Processing pause; the storefront shows its "confirming" screen here
    let delay = state.checkout.processing_delay_ms;
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    // 3. Record whatever the cart holds once the pause is over
    let view = state.cart.view();
    let booking = state
        .recorder
        .record_once(&user, &view)
        .await
        .map_err(|e| match e {
            BookingError::EmptyCart => AppError::ValidationError(e.to_string()),
            BookingError::WriteInProgress | BookingError::AlreadyRecorded { .. } => {
                AppError::ConflictError(e.to_string())
            }
            BookingError::WriteFailed(_) | BookingError::LoadFailed(_) => {
                AppError::UpstreamError(e.to_string())
            }
        })?;

    // 4. The tickets are booked; the cart starts over
    state.cart.clear().await;

    state
        .bus
        .publish(StorefrontEvent::BookingRecorded(BookingRecordedEvent {
            booking_id: booking.id,
            user_id: booking.user_id,
            total_cents: booking.total_cents,
            item_count: view.item_count(),
            recorded_at: booking.date.timestamp(),
        }));

    info!("Checkout complete: booking {} for {}", booking.id, user.uid);
    Ok((StatusCode::CREATED, Json(booking)))
}

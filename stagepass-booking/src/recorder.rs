use std::sync::Arc;

use stagepass_cart::CartView;
use stagepass_core::identity::UserProfile;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Booking, DateOrder, NewBooking};
use crate::store::{BookingStore, DocumentError};

/// Where the current checkout lifecycle stands.
///
/// A lifecycle belongs to one cart revision. It moves Idle → Writing →
/// Written; a failed write falls back to Idle so a later explicit attempt can
/// retry. A new cart revision starts a fresh lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    Idle,
    Writing { revision: u64 },
    Written { revision: u64, booking_id: Uuid },
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Checkout is already being recorded")]
    WriteInProgress,

    #[error("Checkout was already recorded as booking {booking_id}")]
    AlreadyRecorded { booking_id: Uuid },

    #[error("Booking could not be recorded: {0}")]
    WriteFailed(String),

    #[error("Failed to load booking history: {0}")]
    LoadFailed(String),
}

/// Writes checkouts to the document store, at most once per cart revision,
/// and reads booking history back.
pub struct BookingRecorder {
    store: Arc<dyn BookingStore>,
    phase: Mutex<CheckoutPhase>,
}

impl BookingRecorder {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            phase: Mutex::new(CheckoutPhase::Idle),
        }
    }

    /// Record the cart as a booking document, exactly once.
    ///
    /// Duplicate triggers for the same cart revision get `WriteInProgress`
    /// while the write is in flight and `AlreadyRecorded` after it landed;
    /// neither produces a second document.
    pub async fn record_once(
        &self,
        user: &UserProfile,
        cart: &CartView,
    ) -> Result<Booking, BookingError> {
        if cart.items.is_empty() {
            return Err(BookingError::EmptyCart);
        }

        // 1. Claim the lifecycle for this cart revision
        {
            let mut phase = self.phase.lock().await;
            match *phase {
                CheckoutPhase::Writing { revision } if revision == cart.revision => {
                    return Err(BookingError::WriteInProgress);
                }
                CheckoutPhase::Written { revision, booking_id } if revision == cart.revision => {
                    return Err(BookingError::AlreadyRecorded { booking_id });
                }
                _ => {}
            }
            *phase = CheckoutPhase::Writing {
                revision: cart.revision,
            };
        }

        // 2. Write without holding the guard
        let document = NewBooking {
            user_id: user.uid,
            user_email: user.email.inner().clone(),
            items: cart.items.clone(),
            total_cents: cart.total_cents,
        };
        let result = self.store.insert(document).await;

        // 3. Settle the lifecycle. A newer revision may have claimed the
        //    guard while the write was in flight; leave its lifecycle alone.
        let mut phase = self.phase.lock().await;
        let owns_guard = matches!(
            *phase,
            CheckoutPhase::Writing { revision } if revision == cart.revision
        );
        match result {
            Ok(booking) => {
                tracing::info!(
                    "Booking {} recorded for user {} ({} cents)",
                    booking.id,
                    booking.user_id,
                    booking.total_cents
                );
                if owns_guard {
                    *phase = CheckoutPhase::Written {
                        revision: cart.revision,
                        booking_id: booking.id,
                    };
                }
                Ok(booking)
            }
            Err(e) => {
                tracing::error!("Booking write failed: {}", e);
                if owns_guard {
                    *phase = CheckoutPhase::Idle;
                }
                Err(BookingError::WriteFailed(e.to_string()))
            }
        }
    }

    /// Booking history for a user, newest first when the store can order.
    ///
    /// A missing date index downgrades to the unordered query; any other
    /// failure surfaces as `LoadFailed`.
    pub async fn fetch_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, BookingError> {
        match self.store.list_for_user(user_id, Some(DateOrder::Desc)).await {
            Ok(bookings) => Ok(bookings),
            Err(DocumentError::IndexUnavailable { field }) => {
                tracing::warn!(
                    "No '{}' index for ordered booking query, retrying unordered",
                    field
                );
                self.store
                    .list_for_user(user_id, None)
                    .await
                    .map_err(|e| BookingError::LoadFailed(e.to_string()))
            }
            Err(e) => Err(BookingError::LoadFailed(e.to_string())),
        }
    }

    /// The checkout lifecycle as of this instant.
    pub async fn phase(&self) -> CheckoutPhase {
        self.phase.lock().await.clone()
    }
}

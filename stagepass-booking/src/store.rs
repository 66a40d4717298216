use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Booking, DateOrder, NewBooking};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The store cannot serve an ordered query on this field. Callers are
    /// expected to retry unordered.
    #[error("No index for ordered query on field '{field}'")]
    IndexUnavailable { field: String },

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// The external document collection bookings are written to.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Append a booking document. The store assigns the document id and the
    /// server-side timestamp.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, DocumentError>;

    /// All bookings belonging to a user, optionally ordered by date.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        order: Option<DateOrder>,
    ) -> Result<Vec<Booking>, DocumentError>;
}

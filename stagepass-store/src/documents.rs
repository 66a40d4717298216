use async_trait::async_trait;
use chrono::Utc;
use stagepass_booking::{Booking, BookingStore, DateOrder, DocumentError, NewBooking};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Booking collection held in process, standing in for the hosted document
/// store.
///
/// Ordered queries are served only when the `date` index is enabled; without
/// it they fail the way the hosted store fails, so the degraded read path
/// stays reachable by configuration.
pub struct InMemoryDocumentStore {
    bookings: RwLock<Vec<Booking>>,
    date_index: bool,
}

impl InMemoryDocumentStore {
    pub fn new(date_index: bool) -> Self {
        Self {
            bookings: RwLock::new(Vec::new()),
            date_index,
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryDocumentStore {
    async fn insert(&self, booking: NewBooking) -> Result<Booking, DocumentError> {
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: booking.user_id,
            user_email: booking.user_email,
            items: booking.items,
            total_cents: booking.total_cents,
            date: Utc::now(),
        };
        self.bookings.write().await.push(booking.clone());
        tracing::debug!("Stored booking document {}", booking.id);
        Ok(booking)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        order: Option<DateOrder>,
    ) -> Result<Vec<Booking>, DocumentError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .read()
            .await
            .iter()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect();

        if let Some(order) = order {
            if !self.date_index {
                return Err(DocumentError::IndexUnavailable {
                    field: "date".to_string(),
                });
            }
            match order {
                DateOrder::Desc => matches.sort_by(|a, b| b.date.cmp(&a.date)),
                DateOrder::Asc => matches.sort_by(|a, b| a.date.cmp(&b.date)),
            }
        }

        Ok(matches)
    }
}

use stagepass_shared::models::events::{BookingRecordedEvent, SessionChangedEvent};
use tokio::sync::broadcast;
use tracing::info;

/// Storefront happenings fanned out to in-process subscribers.
#[derive(Debug, Clone)]
pub enum StorefrontEvent {
    SessionChanged(SessionChangedEvent),
    BookingRecorded(BookingRecordedEvent),
}

/// Broadcast channel carrying [`StorefrontEvent`]s, the feed behind the SSE
/// stream.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StorefrontEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fan an event out to whoever is listening. No receivers is not an
    /// error.
    pub fn publish(&self, event: StorefrontEvent) {
        match &event {
            StorefrontEvent::SessionChanged(e) => {
                info!("Session changed: signed_in={}", e.signed_in)
            }
            StorefrontEvent::BookingRecorded(e) => {
                info!("Booking recorded: {} ({} cents)", e.booking_id, e.total_cents)
            }
        }
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorefrontEvent> {
        self.tx.subscribe()
    }
}

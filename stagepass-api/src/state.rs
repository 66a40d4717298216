use std::sync::Arc;

use stagepass_booking::BookingRecorder;
use stagepass_cart::CartStore;
use stagepass_catalog::EventCatalog;
use stagepass_core::gateway::IdentityGateway;
use stagepass_store::EventBus;

#[derive(Clone)]
pub struct CheckoutConfig {
    /// Cosmetic processing window before the booking write.
    pub processing_delay_ms: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<EventCatalog>,
    pub cart: Arc<CartStore>,
    pub gateway: Arc<IdentityGateway>,
    pub recorder: Arc<BookingRecorder>,
    pub bus: EventBus,
    pub checkout: CheckoutConfig,
}

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stagepass_api::{app, state::CheckoutConfig, AppState};
use stagepass_booking::recorder::BookingRecorder;
use stagepass_cart::store::CartStore;
use stagepass_catalog::catalog::EventCatalog;
use stagepass_core::gateway::IdentityGateway;
use stagepass_shared::models::events::SessionChangedEvent;
use stagepass_store::{
    app_config::Config, EventBus, FileSnapshotStore, InMemoryDocumentStore, LocalIdentityService,
    StorefrontEvent,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "stagepass_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting StagePass API on port {}", config.server.port);

    // Identity
    let provider = Arc::new(LocalIdentityService::new(
        &config.auth.jwt_secret,
        config.auth.session_ttl_seconds,
    ));
    let gateway = Arc::new(IdentityGateway::new(provider));

    // Cart, restored from the last run's snapshot
    let snapshot = Arc::new(FileSnapshotStore::new(&config.storefront.snapshot_path));
    let cart = Arc::new(CartStore::new(snapshot));
    cart.restore().await;

    // Booking document store
    let documents = Arc::new(InMemoryDocumentStore::new(config.document_store.date_index));
    let recorder = Arc::new(BookingRecorder::new(documents));

    // SSE Broadcast Channel
    let bus = EventBus::new(100);

    // Resolve the session off the serving path; until this lands, guarded
    // routes answer 503 rather than guessing
    let resolve_gateway = gateway.clone();
    let resolve_bus = bus.clone();
    tokio::spawn(async move {
        resolve_gateway.resolve().await;
        let session = resolve_gateway.current();
        resolve_bus.publish(StorefrontEvent::SessionChanged(SessionChangedEvent {
            uid: session.user().map(|u| u.uid),
            signed_in: session.user().is_some(),
            changed_at: Utc::now().timestamp(),
        }));
    });

    let app_state = AppState {
        catalog: Arc::new(EventCatalog::seeded()),
        cart,
        gateway,
        recorder,
        bus,
        checkout: CheckoutConfig {
            processing_delay_ms: config.storefront.checkout_delay_ms,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

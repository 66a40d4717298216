pub mod app_config;
pub mod documents;
pub mod events;
pub mod identity_service;
pub mod snapshot;

pub use documents::InMemoryDocumentStore;
pub use events::{EventBus, StorefrontEvent};
pub use identity_service::LocalIdentityService;
pub use snapshot::FileSnapshotStore;

pub mod models;
pub mod snapshot;
pub mod store;

pub use models::{CartLineItem, CartView};
pub use snapshot::{SnapshotError, SnapshotStore};
pub use store::{CartError, CartStore};
